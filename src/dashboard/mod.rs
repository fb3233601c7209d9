//! Dashboard view model and its reducer.
//!
//! [`Dashboard`] combines the App Shell, the Profile Manager, the widget
//! feeds and the UI mode. [`Dashboard::update`] is a pure reducer: it takes
//! a [`Msg`], returns the next state and a list of [`Effect`]s for the
//! runtime to perform. Network results and timer ticks come back as
//! further messages.
//!
//! After every message the set of mounted widgets (enabled entries of the
//! mapping) is compared with the previous one. Newly mounted widgets start
//! their timers or fetches, unmounted ones cancel theirs, and widgets whose
//! polling period changed have their timer replaced.

mod effect;


pub use effect::{Effect, TimerKey};

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveTime;
use dashboard_api::{PhotoWidgetSettings, SettingsMapping, WidgetId, WidgetSettings};
use tracing::debug;

use crate::container::{ResizeDraft, WidgetContainer};
use crate::profile::{ProfileCommand, ProfileManager, ProfileName};
use crate::settings::WidgetPatch;
use crate::shell::{LoadTicket, Shell};
use crate::widgets::{Feed, FeedData, Feeds, CLOCK_ID, PHOTO_ID};

/// Clock timer period.
pub const CLOCK_PERIOD: Duration = Duration::from_secs(1);

/// What keyboard input currently edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing a profile name.
    EditProfile,
    /// Typing the photo refresh interval in seconds.
    EditInterval,
    /// Resizing the focused widget.
    Resize(ResizeDraft),
}

/// Input to the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Issue the first settings read.
    Start,
    BeginProfileEdit,
    Input(char),
    Backspace,
    /// Confirm the current edit or resize.
    Submit,
    /// Abandon the current edit or resize.
    Cancel,
    /// Switch profile without going through the editor.
    SwitchProfile(ProfileName),
    SaveProfile,
    ReloadProfile,
    /// Re-enable the first hidden widget.
    RestoreHidden,
    SettingsLoaded {
        ticket: LoadTicket,
        result: Result<SettingsMapping, String>,
    },
    SettingsSaved {
        profile: ProfileName,
        result: Result<(), String>,
    },
    FocusNext,
    FocusPrev,
    CloseFocused,
    BeginResize,
    /// Grow or shrink the resize draft by whole cells.
    ResizeBy { cols: i16, rows: i16 },
    /// A container reported a settings change.
    ///
    /// Close and resize gestures arrive here, and so does any external
    /// editor driving the dashboard through [`Dashboard::update`].
    WidgetUpdated { id: WidgetId, patch: WidgetPatch },
    ClockTick(NaiveTime),
    TimerFired(TimerKey),
    FeedLoaded {
        feed: Feed,
        seq: u64,
        result: Result<FeedData, String>,
    },
    BeginIntervalEdit,
    SavePhotoSettings,
    PhotoSettingsLoaded {
        seq: u64,
        result: Result<PhotoWidgetSettings, String>,
    },
    PhotoSettingsSaved { result: Result<(), String> },
}

/// The whole dashboard state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    shell: Shell,
    profile_manager: ProfileManager,
    feeds: Feeds,
    focus: Option<WidgetId>,
    mode: Mode,
    notice: Option<String>,
    /// Mounted widgets and their polling period in milliseconds.
    mounted: BTreeMap<WidgetId, Option<u64>>,
}

impl Dashboard {
    pub fn new(profile: ProfileName) -> Self {
        Self {
            shell: Shell::new(profile),
            ..Self::default()
        }
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn profile(&self) -> &ProfileName {
        self.shell.profile()
    }

    pub fn profile_manager(&self) -> &ProfileManager {
        &self.profile_manager
    }

    pub fn feeds(&self) -> &Feeds {
        &self.feeds
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Focused widget id.
    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    /// Last one-off message for the status line.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Mounted widget ids in render order.
    pub fn mounted_ids(&self) -> impl Iterator<Item = &str> {
        self.mounted.keys().map(String::as_str)
    }

    pub fn is_mounted(&self, id: &str) -> bool {
        self.mounted.contains_key(id)
    }

    /// Applies `msg` and returns the next state with the effects to run.
    pub fn update(mut self, msg: Msg) -> (Self, Vec<Effect>) {
        let mut effects = Vec::new();
        self.apply(msg, &mut effects);
        self.reconcile(&mut effects);
        (self, effects)
    }

    fn apply(&mut self, msg: Msg, effects: &mut Vec<Effect>) {
        match msg {
            Msg::Start => effects.push(Effect::LoadSettings(self.shell.start())),
            Msg::BeginProfileEdit => {
                self.profile_manager.begin_edit(self.shell.profile());
                self.mode = Mode::EditProfile;
            }
            Msg::Input(c) => match self.mode {
                Mode::EditProfile => self.profile_manager.input(c),
                Mode::EditInterval => self.feeds.photo.input(c),
                _ => {}
            },
            Msg::Backspace => match self.mode {
                Mode::EditProfile => self.profile_manager.backspace(),
                Mode::EditInterval => self.feeds.photo.backspace(),
                _ => {}
            },
            Msg::Submit => self.submit(effects),
            Msg::Cancel => {
                match self.mode {
                    Mode::EditProfile => self.profile_manager.cancel(),
                    Mode::EditInterval => self.feeds.photo.cancel_interval_edit(),
                    _ => {}
                }
                self.mode = Mode::Normal;
            }
            Msg::SwitchProfile(name) => {
                self.run_profile_command(ProfileCommand::Switch(name), effects)
            }
            Msg::SaveProfile => {
                let cmd = self.profile_manager.save();
                self.run_profile_command(cmd, effects);
            }
            Msg::ReloadProfile => {
                self.notice = None;
                effects.push(Effect::LoadSettings(self.shell.reload()));
            }
            Msg::RestoreHidden => {
                let hidden = self.shell.hidden_ids().first().map(|id| id.to_string());
                self.notice = match hidden {
                    Some(id) if self.shell.restore(&id) => Some(format!("Restored {id}")),
                    _ => Some("No hidden widgets".to_string()),
                };
            }
            Msg::SettingsLoaded { ticket, result } => {
                self.shell.settings_loaded(&ticket, result);
            }
            Msg::SettingsSaved { profile, result } => {
                self.shell.save_finished(&profile, result);
            }
            Msg::FocusNext => self.move_focus(1),
            Msg::FocusPrev => self.move_focus(-1),
            Msg::CloseFocused => {
                let update = self.focused_container().map(|c| c.close());
                if let Some((id, patch)) = update {
                    self.apply(Msg::WidgetUpdated { id, patch }, effects);
                }
            }
            Msg::BeginResize => {
                let draft = self.focused_container().map(|c| c.begin_resize());
                if let Some(draft) = draft {
                    self.mode = Mode::Resize(draft);
                }
            }
            Msg::ResizeBy { cols, rows } => {
                if let Mode::Resize(draft) = &mut self.mode {
                    draft.resize_by(cols, rows);
                }
            }
            Msg::WidgetUpdated { id, patch } => {
                if id == PHOTO_ID {
                    if let (Some(width), Some(height)) = (patch.width, patch.height) {
                        self.feeds.photo.resize(width, height);
                    }
                }
                self.shell.on_update(&id, &patch);
            }
            Msg::ClockTick(time) => {
                if self.is_mounted(CLOCK_ID) {
                    self.feeds.clock = Some(time);
                }
            }
            Msg::TimerFired(key) => self.timer_fired(key, effects),
            Msg::FeedLoaded { feed, seq, result } => {
                if !self.feeds.settle(feed, seq, result) {
                    debug!(?feed, seq, "dropping stale feed response");
                }
            }
            Msg::BeginIntervalEdit => {
                if self.is_mounted(PHOTO_ID) {
                    self.feeds.photo.begin_interval_edit();
                    self.mode = Mode::EditInterval;
                }
            }
            Msg::SavePhotoSettings => {
                if self.is_mounted(PHOTO_ID) {
                    let request = self.feeds.photo.save_request(self.shell.profile());
                    effects.push(Effect::SavePhotoSettings(request));
                }
            }
            Msg::PhotoSettingsLoaded { seq, result } => {
                self.feeds.photo.settings_loaded(seq, result);
            }
            Msg::PhotoSettingsSaved { result } => {
                self.notice = Some(match result {
                    Ok(()) => "Photo settings saved".to_string(),
                    Err(e) => format!("Photo settings save failed: {e}"),
                });
            }
        }
    }

    fn submit(&mut self, effects: &mut Vec<Effect>) {
        match std::mem::take(&mut self.mode) {
            Mode::EditProfile => {
                if let Some(cmd) = self.profile_manager.commit(self.shell.profile()) {
                    self.run_profile_command(cmd, effects);
                }
            }
            Mode::EditInterval => {
                if let Some(ms) = self.feeds.photo.commit_interval() {
                    self.notice = Some(format!("Photo refresh every {} s", ms / 1000));
                }
            }
            Mode::Resize(draft) => {
                let update = self
                    .container(draft.id())
                    .map(|c| c.resize_stop(draft.width(), draft.height()));
                match update {
                    Some((id, patch)) => self.apply(Msg::WidgetUpdated { id, patch }, effects),
                    None => debug!(id = draft.id(), "resized widget left the mapping"),
                }
            }
            Mode::Normal => {}
        }
    }

    fn run_profile_command(&mut self, cmd: ProfileCommand, effects: &mut Vec<Effect>) {
        match cmd {
            ProfileCommand::Switch(name) => {
                if let Some(ticket) = self.shell.change_profile(name) {
                    self.notice = None;
                    effects.push(Effect::LoadSettings(ticket));
                }
            }
            ProfileCommand::Save => effects.push(Effect::SaveSettings(self.shell.save())),
        }
    }

    fn timer_fired(&mut self, key: TimerKey, effects: &mut Vec<Effect>) {
        let TimerKey::Poll(feed) = key else {
            return;
        };
        if !self.is_mounted(feed.widget_id()) {
            debug!(?feed, "timer fired for unmounted widget");
            return;
        }
        let seq = self.feeds.begin(feed);
        effects.push(Effect::Fetch { feed, seq });
    }

    fn container(&self, id: &str) -> Option<WidgetContainer<'_>> {
        let (id, settings) = self.shell.settings().get_key_value(id)?;
        Some(WidgetContainer::new(id, settings))
    }

    fn focused_container(&self) -> Option<WidgetContainer<'_>> {
        self.container(self.focus.as_deref()?)
    }

    fn move_focus(&mut self, step: isize) {
        let ids: Vec<&WidgetId> = self.mounted.keys().collect();
        if ids.is_empty() {
            self.focus = None;
            return;
        }
        let len = ids.len() as isize;
        let next = match self
            .focus
            .as_ref()
            .and_then(|f| ids.iter().position(|id| *id == f))
        {
            Some(i) => (i as isize + step).rem_euclid(len),
            None => 0,
        };
        self.focus = Some(ids[next as usize].clone());
    }

    /// Polling period of a mounted widget in milliseconds.
    fn poll_period(&self, id: &str, settings: &WidgetSettings) -> Option<u64> {
        if id == CLOCK_ID {
            return Some(CLOCK_PERIOD.as_millis() as u64);
        }
        match Feed::for_widget(id)? {
            Feed::OneDrive => Some(self.feeds.photo.interval_ms()),
            _ => settings.refresh_interval_ms.filter(|ms| *ms > 0),
        }
    }

    fn reconcile(&mut self, effects: &mut Vec<Effect>) {
        let desired: BTreeMap<WidgetId, Option<u64>> = self
            .shell
            .settings()
            .iter()
            .filter(|(id, s)| WidgetContainer::new(id, s).is_mounted())
            .map(|(id, s)| (id.clone(), self.poll_period(id, s)))
            .collect();

        let previous = std::mem::take(&mut self.mounted);
        for id in previous.keys().filter(|id| !desired.contains_key(*id)) {
            self.unmount(id, effects);
        }
        for (id, period) in &desired {
            match previous.get(id) {
                None => self.mount(id, *period, effects),
                Some(old) if old != period => self.repoll(id, *period, effects),
                Some(_) => {}
            }
        }
        self.mounted = desired;

        let editing_unmounted = match &self.mode {
            Mode::Resize(draft) => !self.mounted.contains_key(draft.id()),
            Mode::EditInterval => !self.mounted.contains_key(PHOTO_ID),
            _ => false,
        };
        if editing_unmounted {
            self.mode = Mode::Normal;
        }
        let focus_valid = self
            .focus
            .as_ref()
            .is_some_and(|f| self.mounted.contains_key(f));
        if !focus_valid {
            self.focus = self.mounted.keys().next().cloned();
        }
    }

    fn mount(&mut self, id: &str, period: Option<u64>, effects: &mut Vec<Effect>) {
        debug!(id, ?period, "mounting widget");
        if id == CLOCK_ID {
            effects.push(Effect::StartTimer {
                key: TimerKey::Clock,
                period: CLOCK_PERIOD,
            });
            return;
        }
        let Some(feed) = Feed::for_widget(id) else {
            return;
        };
        if feed == Feed::OneDrive {
            let seq = self.feeds.photo.begin_settings();
            effects.push(Effect::LoadPhotoSettings {
                profile: self.shell.profile().clone(),
                seq,
            });
        }
        match period {
            Some(ms) => effects.push(Effect::StartTimer {
                key: TimerKey::Poll(feed),
                period: Duration::from_millis(ms),
            }),
            None => {
                let seq = self.feeds.begin(feed);
                effects.push(Effect::Fetch { feed, seq });
            }
        }
    }

    fn repoll(&mut self, id: &str, period: Option<u64>, effects: &mut Vec<Effect>) {
        let Some(feed) = Feed::for_widget(id) else {
            return;
        };
        debug!(id, ?period, "polling period changed");
        let key = TimerKey::Poll(feed);
        effects.push(match period {
            Some(ms) => Effect::StartTimer {
                key,
                period: Duration::from_millis(ms),
            },
            None => Effect::CancelTimer(key),
        });
    }

    fn unmount(&mut self, id: &str, effects: &mut Vec<Effect>) {
        debug!(id, "unmounting widget");
        if id == CLOCK_ID {
            effects.push(Effect::CancelTimer(TimerKey::Clock));
        } else if let Some(feed) = Feed::for_widget(id) {
            effects.push(Effect::CancelTimer(TimerKey::Poll(feed)));
        }
        self.feeds.unmount(id);
    }
}
