//! Effect runtime: performs the I/O the reducer asks for.
//!
//! Every [`Effect`] becomes either a spawned task that calls the backend
//! and sends the outcome back as a [`Msg`], or a change to the set of
//! running timers. The runtime owns the timers; dropping it cancels them.

use std::sync::Arc;

use chrono::Local;
use dashboard_api::{ApiError, DashboardApi};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::dashboard::{Effect, Msg, TimerKey};
use crate::timer::{TimerHandle, TimerSet};
use crate::widgets::{Feed, FeedData};

/// Executes effects against a [`DashboardApi`].
pub struct Runtime {
    api: Arc<dyn DashboardApi>,
    tx: UnboundedSender<Msg>,
    timers: TimerSet<TimerKey>,
}

impl Runtime {
    /// Creates a runtime reporting results on `tx`.
    pub fn new(api: Arc<dyn DashboardApi>, tx: UnboundedSender<Msg>) -> Self {
        Self {
            api,
            tx,
            timers: TimerSet::new(),
        }
    }

    /// Number of running timers.
    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_timer_active(&self, key: TimerKey) -> bool {
        self.timers.is_active(&key)
    }

    pub fn execute_all(&mut self, effects: impl IntoIterator<Item = Effect>) {
        for effect in effects {
            self.execute(effect);
        }
    }

    /// Performs one effect. Must be called from within a tokio runtime.
    pub fn execute(&mut self, effect: Effect) {
        debug!(effect = effect.name(), "executing effect");
        match effect {
            Effect::LoadSettings(ticket) => {
                self.spawn(move |api| async move {
                    let result = api
                        .widget_settings(ticket.profile.as_str())
                        .await
                        .map_err(|e| report("settings load", e));
                    Msg::SettingsLoaded { ticket, result }
                });
            }
            Effect::SaveSettings(request) => {
                self.spawn(move |api| async move {
                    let result = api
                        .save_widget_settings(request.profile.as_str(), &request.settings)
                        .await
                        .map_err(|e| report("settings save", e));
                    Msg::SettingsSaved {
                        profile: request.profile,
                        result,
                    }
                });
            }
            Effect::Fetch { feed, seq } => {
                self.spawn(move |api| async move {
                    let result = fetch_feed(api.as_ref(), feed)
                        .await
                        .map_err(|e| report("feed fetch", e));
                    Msg::FeedLoaded { feed, seq, result }
                });
            }
            Effect::LoadPhotoSettings { profile, seq } => {
                self.spawn(move |api| async move {
                    let result = api
                        .photo_widget_settings(profile.as_str())
                        .await
                        .map_err(|e| report("photo settings load", e));
                    Msg::PhotoSettingsLoaded { seq, result }
                });
            }
            Effect::SavePhotoSettings(request) => {
                self.spawn(move |api| async move {
                    let result = api
                        .save_photo_widget_settings(&request)
                        .await
                        .map_err(|e| report("photo settings save", e));
                    Msg::PhotoSettingsSaved { result }
                });
            }
            Effect::StartTimer { key, period } => {
                let tx = self.tx.clone();
                let handle = match key {
                    TimerKey::Clock => {
                        TimerHandle::every(period, tx, || Msg::ClockTick(Local::now().time()))
                    }
                    TimerKey::Poll(_) => TimerHandle::every(period, tx, move || Msg::TimerFired(key)),
                };
                self.timers.start(key, handle);
            }
            Effect::CancelTimer(key) => {
                self.timers.cancel(&key);
            }
        }
    }

    /// Runs `task` on its own tokio task and sends its message back.
    fn spawn<F, Fut>(&self, task: F)
    where
        F: FnOnce(Arc<dyn DashboardApi>) -> Fut,
        Fut: std::future::Future<Output = Msg> + Send + 'static,
    {
        let tx = self.tx.clone();
        let fut = task(Arc::clone(&self.api));
        tokio::spawn(async move {
            // The receiver is gone once the front end has exited.
            let _ = tx.send(fut.await);
        });
    }
}

/// Logs a failed call and turns it into the text shown to the user.
/// Backend error bodies are shown verbatim.
fn report(what: &str, err: ApiError) -> String {
    warn!(error = %err, "{what} failed");
    match err {
        ApiError::Backend(message) => message,
        other => other.to_string(),
    }
}

/// Calls the endpoint behind `feed`.
async fn fetch_feed(api: &dyn DashboardApi, feed: Feed) -> Result<FeedData, ApiError> {
    Ok(match feed {
        Feed::Weather => FeedData::Weather(api.weather().await?),
        Feed::Calendar => FeedData::Calendar(api.calendar().await?),
        Feed::Photos => FeedData::Photos(api.photos().await?),
        Feed::OneDrive => FeedData::Image(api.onedrive_image().await?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileName;
    use crate::shell::{LoadTicket, SaveRequest};
    use async_trait::async_trait;
    use dashboard_api::{
        CalendarFeed, OneDriveImage, Photo, PhotoWidgetSettings, SavePhotoSettingsRequest,
        SettingsMapping, Weather, WidgetSettings,
    };
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[derive(Default)]
    struct FakeApi {
        calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn record(&self, call: String) {
            self.calls.lock().expect("calls lock").push(call);
        }
    }

    #[async_trait]
    impl DashboardApi for FakeApi {
        async fn calendar(&self) -> Result<CalendarFeed, ApiError> {
            self.record("calendar".to_string());
            Err(ApiError::Backend("calendar unavailable".to_string()))
        }

        async fn weather(&self) -> Result<Weather, ApiError> {
            self.record("weather".to_string());
            Ok(Weather {
                temperature: 12.5,
                condition: "overcast".to_string(),
            })
        }

        async fn photos(&self) -> Result<Vec<Photo>, ApiError> {
            self.record("photos".to_string());
            Ok(Vec::new())
        }

        async fn widget_settings(&self, profile: &str) -> Result<SettingsMapping, ApiError> {
            self.record(format!("settings:{profile}"));
            let mut mapping = SettingsMapping::new();
            mapping.insert("clock".to_string(), WidgetSettings::default());
            Ok(mapping)
        }

        async fn save_widget_settings(
            &self,
            profile: &str,
            settings: &SettingsMapping,
        ) -> Result<(), ApiError> {
            self.record(format!("save:{profile}:{}", settings.len()));
            Ok(())
        }

        async fn onedrive_image(&self) -> Result<OneDriveImage, ApiError> {
            self.record("onedrive".to_string());
            Ok(OneDriveImage::default())
        }

        async fn photo_widget_settings(
            &self,
            profile: &str,
        ) -> Result<PhotoWidgetSettings, ApiError> {
            self.record(format!("photo-settings:{profile}"));
            Ok(PhotoWidgetSettings::default())
        }

        async fn save_photo_widget_settings(
            &self,
            settings: &SavePhotoSettingsRequest,
        ) -> Result<(), ApiError> {
            self.record(format!("save-photo:{}", settings.interval_ms));
            Err(ApiError::Status(500))
        }
    }

    fn runtime() -> (Runtime, Arc<FakeApi>, mpsc::UnboundedReceiver<Msg>) {
        let api = Arc::new(FakeApi::default());
        let (tx, rx) = mpsc::unbounded_channel();
        (Runtime::new(api.clone(), tx), api, rx)
    }

    #[tokio::test]
    async fn test_load_settings_reports_mapping() {
        let (mut runtime, api, mut rx) = runtime();
        let ticket = LoadTicket {
            profile: ProfileName::new("office").expect("name"),
            seq: 3,
        };
        runtime.execute(Effect::LoadSettings(ticket.clone()));

        match rx.recv().await.expect("message") {
            Msg::SettingsLoaded { ticket: t, result } => {
                assert_eq!(t, ticket);
                assert!(result.expect("mapping").contains_key("clock"));
            }
            other => panic!("unexpected message: {other:?}"),
        }
        assert_eq!(*api.calls.lock().expect("calls lock"), vec!["settings:office"]);
    }

    #[tokio::test]
    async fn test_save_settings_reports_outcome() {
        let (mut runtime, api, mut rx) = runtime();
        let mut settings = SettingsMapping::new();
        settings.insert("clock".to_string(), WidgetSettings::default());
        runtime.execute(Effect::SaveSettings(SaveRequest {
            profile: ProfileName::default(),
            settings,
        }));

        let msg = rx.recv().await.expect("message");
        assert_eq!(
            msg,
            Msg::SettingsSaved {
                profile: ProfileName::default(),
                result: Ok(()),
            }
        );
        assert_eq!(*api.calls.lock().expect("calls lock"), vec!["save:default:1"]);
    }

    #[tokio::test]
    async fn test_fetch_reports_feed_data_and_errors() {
        let (mut runtime, _api, mut rx) = runtime();
        runtime.execute(Effect::Fetch {
            feed: Feed::Weather,
            seq: 1,
        });
        match rx.recv().await.expect("message") {
            Msg::FeedLoaded {
                feed: Feed::Weather,
                seq: 1,
                result: Ok(FeedData::Weather(w)),
            } => assert_eq!(w.condition, "overcast"),
            other => panic!("unexpected message: {other:?}"),
        }

        runtime.execute(Effect::Fetch {
            feed: Feed::Calendar,
            seq: 2,
        });
        match rx.recv().await.expect("message") {
            Msg::FeedLoaded { result: Err(e), .. } => assert_eq!(e, "calendar unavailable"),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_photo_settings_save_failure_is_reported() {
        let (mut runtime, _api, mut rx) = runtime();
        runtime.execute(Effect::SavePhotoSettings(SavePhotoSettingsRequest {
            profile: "default".to_string(),
            interval_ms: 10_000,
            width: 400,
            height: 300,
        }));
        match rx.recv().await.expect("message") {
            Msg::PhotoSettingsSaved { result: Err(e) } => assert!(e.contains("500")),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_restarting_timer_keeps_one_running() {
        let (mut runtime, _api, mut rx) = runtime();
        let key = TimerKey::Poll(Feed::OneDrive);
        runtime.execute(Effect::StartTimer {
            key,
            period: Duration::from_secs(60),
        });
        runtime.execute(Effect::StartTimer {
            key,
            period: Duration::from_secs(10),
        });
        assert_eq!(runtime.active_timers(), 1);

        tokio::time::sleep(Duration::from_secs(25)).await;
        let mut fired = 0;
        while let Ok(msg) = rx.try_recv() {
            assert_eq!(msg, Msg::TimerFired(key));
            fired += 1;
        }
        // Immediate tick plus t=10s and t=20s of the second timer only.
        assert_eq!(fired, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_timer_sends_ticks_until_cancelled() {
        let (mut runtime, _api, mut rx) = runtime();
        runtime.execute(Effect::StartTimer {
            key: TimerKey::Clock,
            period: Duration::from_secs(1),
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(matches!(rx.try_recv(), Ok(Msg::ClockTick(_))));

        runtime.execute(Effect::CancelTimer(TimerKey::Clock));
        assert!(!runtime.is_timer_active(TimerKey::Clock));
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }
}
