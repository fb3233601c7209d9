//! End-to-end settings lifecycle: reducer, effect runtime and HTTP client
//! against a mock backend.

use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use kitchen_dashboard::dashboard::{Dashboard, Msg, TimerKey};
use kitchen_dashboard::dashboard_api::DashboardClient;
use kitchen_dashboard::profile::ProfileName;
use kitchen_dashboard::runtime::Runtime;
use serde_json::json;
use tokio::sync::mpsc::{self, UnboundedReceiver};

struct Harness {
    dashboard: Dashboard,
    runtime: Runtime,
    rx: UnboundedReceiver<Msg>,
}

impl Harness {
    fn new(server: &MockServer) -> Self {
        let client = DashboardClient::new(&server.base_url(), Duration::from_secs(5))
            .expect("mock server URL is valid");
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            dashboard: Dashboard::new(ProfileName::default()),
            runtime: Runtime::new(Arc::new(client), tx),
            rx,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let dashboard = std::mem::take(&mut self.dashboard);
        let (dashboard, effects) = dashboard.update(msg);
        self.dashboard = dashboard;
        self.runtime.execute_all(effects);
    }

    /// Feeds runtime messages back until one matches `done`.
    async fn pump_until(&mut self, done: impl Fn(&Msg) -> bool) {
        loop {
            let msg = tokio::time::timeout(Duration::from_secs(5), self.rx.recv())
                .await
                .expect("runtime answered in time")
                .expect("channel open");
            let finished = done(&msg);
            self.dispatch(msg);
            if finished {
                return;
            }
        }
    }
}

fn is_settings_loaded(msg: &Msg) -> bool {
    matches!(msg, Msg::SettingsLoaded { .. })
}

#[tokio::test]
async fn profile_switch_fetches_new_profile_once_and_remounts() {
    let server = MockServer::start();
    let default_settings = server.mock(|when, then| {
        when.method(GET)
            .path("/api/widgets/settings")
            .query_param("profile", "default");
        then.status(200).json_body(json!({
            "clock": {"enabled": true, "width": 320, "height": 160},
            "weather": {"enabled": false}
        }));
    });
    let office_settings = server.mock(|when, then| {
        when.method(GET)
            .path("/api/widgets/settings")
            .query_param("profile", "office");
        then.status(200).json_body(json!({
            "weather": {"enabled": true, "width": 400, "height": 200}
        }));
    });
    let weather = server.mock(|when, then| {
        when.method(GET).path("/api/weather");
        then.status(200)
            .json_body(json!({"temperature": 18.0, "condition": "sunny"}));
    });

    let mut harness = Harness::new(&server);
    harness.dispatch(Msg::Start);
    harness.pump_until(is_settings_loaded).await;

    assert!(harness.dashboard.is_mounted("clock"));
    assert!(!harness.dashboard.is_mounted("weather"));
    assert!(harness.runtime.is_timer_active(TimerKey::Clock));

    harness.dispatch(Msg::SwitchProfile(
        ProfileName::new("office").expect("profile name"),
    ));
    // Prior mapping is discarded straight away.
    assert!(harness.dashboard.shell().settings().is_empty());
    assert!(!harness.runtime.is_timer_active(TimerKey::Clock));

    harness.pump_until(is_settings_loaded).await;
    harness
        .pump_until(|msg| matches!(msg, Msg::FeedLoaded { .. }))
        .await;

    assert_eq!(harness.dashboard.profile().as_str(), "office");
    assert!(harness.dashboard.is_mounted("weather"));
    assert!(!harness.dashboard.is_mounted("clock"));
    assert_eq!(default_settings.calls(), 1);
    assert_eq!(office_settings.calls(), 1);
    assert_eq!(weather.calls(), 1);
}

#[tokio::test]
async fn closing_and_saving_persists_the_full_mapping() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/widgets/settings")
            .query_param("profile", "default");
        then.status(200).json_body(json!({
            "clock": {"enabled": true, "width": 320, "height": 160, "theme": "dark"}
        }));
    });
    let save = server.mock(|when, then| {
        when.method(POST)
            .path("/api/widgets/settings")
            .header("content-type", "application/json");
        then.status(200).json_body(json!({"status": "ok"}));
    });

    let mut harness = Harness::new(&server);
    harness.dispatch(Msg::Start);
    harness.pump_until(is_settings_loaded).await;

    harness.dispatch(Msg::CloseFocused);
    assert!(!harness.dashboard.is_mounted("clock"));

    harness.dispatch(Msg::SaveProfile);
    harness
        .pump_until(|msg| matches!(msg, Msg::SettingsSaved { .. }))
        .await;

    assert_eq!(save.calls(), 1);
    assert_eq!(harness.dashboard.shell().save_status().to_string(), "saved");
    let clock = &harness.dashboard.shell().settings()["clock"];
    assert!(!clock.enabled);
    assert_eq!(clock.extra["theme"], "dark");
}

#[tokio::test]
async fn failed_settings_load_is_reported() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/widgets/settings");
        then.status(500).json_body(json!({"error": "database offline"}));
    });

    let mut harness = Harness::new(&server);
    harness.dispatch(Msg::Start);
    harness.pump_until(is_settings_loaded).await;

    assert_eq!(
        harness.dashboard.shell().load_status().to_string(),
        "load failed: database offline"
    );
    assert_eq!(harness.dashboard.mounted_ids().count(), 0);
}
