//! Side effects requested by the dashboard reducer.

use std::time::Duration;

use dashboard_api::SavePhotoSettingsRequest;

use crate::profile::ProfileName;
use crate::shell::{LoadTicket, SaveRequest};
use crate::widgets::Feed;

/// Identifies a recurring timer owned by a mounted widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKey {
    /// One-second clock tick.
    Clock,
    /// Polling of a feed.
    Poll(Feed),
}

/// Work for the runtime. Results come back as [`Msg`](super::Msg)s.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Read the settings mapping for the ticket's profile.
    LoadSettings(LoadTicket),
    /// Persist the full mapping.
    SaveSettings(SaveRequest),
    /// Fetch a feed once.
    Fetch { feed: Feed, seq: u64 },
    /// Read the photo widget's own settings.
    LoadPhotoSettings { profile: ProfileName, seq: u64 },
    /// Persist the photo widget's own settings.
    SavePhotoSettings(SavePhotoSettingsRequest),
    /// Start (or restart) a timer, replacing any running under `key`.
    StartTimer { key: TimerKey, period: Duration },
    /// Stop the timer under `key`.
    CancelTimer(TimerKey),
}

impl Effect {
    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::LoadSettings(_) => "load-settings",
            Effect::SaveSettings(_) => "save-settings",
            Effect::Fetch { .. } => "fetch",
            Effect::LoadPhotoSettings { .. } => "load-photo-settings",
            Effect::SavePhotoSettings(_) => "save-photo-settings",
            Effect::StartTimer { .. } => "start-timer",
            Effect::CancelTimer(_) => "cancel-timer",
        }
    }
}
