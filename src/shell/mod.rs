//! App Shell: the settings mapping of the active profile.
//!
//! The shell owns `widgetId -> settings` for one profile at a time. It
//! hands out [`LoadTicket`]s when it needs the mapping read and a
//! [`SaveRequest`] when the user saves; the runtime performs the I/O and
//! feeds the outcome back through [`Shell::settings_loaded`] and
//! [`Shell::save_finished`].
//!
//! Switching profiles clears the mapping at once. Responses whose ticket is
//! not the latest one issued are ignored, and widgets edited after a load
//! was issued keep their local entry when that load lands.

use std::collections::BTreeSet;
use std::fmt;

use dashboard_api::{SettingsMapping, WidgetId};
use tracing::{info, warn};

use crate::profile::ProfileName;
use crate::settings::{merge, WidgetPatch};


/// Identifies one settings read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    /// Profile the read was issued for.
    pub profile: ProfileName,
    /// Position of the read among all reads issued by the shell.
    pub seq: u64,
}

/// Outcome of the most recent settings read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// A read is in flight.
    #[default]
    Loading,
    /// The mapping reflects the backend.
    Ready,
    /// The read failed; the mapping was left as it was.
    Failed(String),
}

/// Outcome of the most recent save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SaveStatus {
    /// Nothing saved since the profile was selected.
    #[default]
    Idle,
    /// A save is in flight.
    Saving,
    /// The backend acknowledged the save.
    Saved,
    /// The save failed.
    Failed(String),
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStatus::Loading => write!(f, "loading"),
            LoadStatus::Ready => write!(f, "loaded"),
            LoadStatus::Failed(msg) => write!(f, "load failed: {msg}"),
        }
    }
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveStatus::Idle => Ok(()),
            SaveStatus::Saving => write!(f, "saving"),
            SaveStatus::Saved => write!(f, "saved"),
            SaveStatus::Failed(msg) => write!(f, "save failed: {msg}"),
        }
    }
}

/// Full mapping to persist for a profile.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    /// Profile the mapping is saved under.
    pub profile: ProfileName,
    /// Every entry of the in-memory mapping.
    pub settings: SettingsMapping,
}

/// Settings state for the active profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shell {
    profile: ProfileName,
    settings: SettingsMapping,
    load_status: LoadStatus,
    save_status: SaveStatus,
    /// Sequence number of the latest issued read.
    issued: u64,
    /// Widgets edited locally since the latest read was issued.
    edited_since_load: BTreeSet<WidgetId>,
}

impl Shell {
    /// Creates a shell for `profile` with an empty mapping.
    pub fn new(profile: ProfileName) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    /// Active profile.
    pub fn profile(&self) -> &ProfileName {
        &self.profile
    }

    /// In-memory mapping for the active profile.
    pub fn settings(&self) -> &SettingsMapping {
        &self.settings
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    pub fn save_status(&self) -> &SaveStatus {
        &self.save_status
    }

    /// Issues the first read for the active profile.
    pub fn start(&mut self) -> LoadTicket {
        self.issue_load()
    }

    /// Selects another profile.
    ///
    /// The mapping is cleared immediately, discarding unsaved edits, and one
    /// read is issued. Selecting the active profile does nothing.
    pub fn change_profile(&mut self, profile: ProfileName) -> Option<LoadTicket> {
        if profile == self.profile {
            return None;
        }
        info!(from = %self.profile, to = %profile, "switching profile");
        self.profile = profile;
        self.settings.clear();
        self.save_status = SaveStatus::Idle;
        Some(self.issue_load())
    }

    /// Re-reads the active profile. The current mapping stays until the
    /// response replaces it.
    pub fn reload(&mut self) -> LoadTicket {
        self.issue_load()
    }

    fn issue_load(&mut self) -> LoadTicket {
        self.issued += 1;
        self.load_status = LoadStatus::Loading;
        self.edited_since_load.clear();
        LoadTicket {
            profile: self.profile.clone(),
            seq: self.issued,
        }
    }

    /// Applies the response to a read.
    ///
    /// Returns `false` for a response that is not the latest read. A
    /// successful response replaces the mapping, except for entries edited
    /// locally since the read was issued. A failure keeps the mapping.
    pub fn settings_loaded(
        &mut self,
        ticket: &LoadTicket,
        result: Result<SettingsMapping, String>,
    ) -> bool {
        if ticket.seq != self.issued || ticket.profile != self.profile {
            info!(profile = %ticket.profile, seq = ticket.seq, "dropping stale settings response");
            return false;
        }
        match result {
            Ok(mut loaded) => {
                for id in std::mem::take(&mut self.edited_since_load) {
                    if let Some(local) = self.settings.get(&id) {
                        loaded.insert(id, local.clone());
                    }
                }
                info!(profile = %self.profile, widgets = loaded.len(), "settings loaded");
                self.settings = loaded;
                self.load_status = LoadStatus::Ready;
            }
            Err(message) => {
                warn!(profile = %self.profile, error = %message, "settings load failed");
                self.edited_since_load.clear();
                self.load_status = LoadStatus::Failed(message);
            }
        }
        true
    }

    /// Shallow-merges `patch` into the entry for `id`.
    pub fn on_update(&mut self, id: &str, patch: &WidgetPatch) {
        if patch.is_empty() {
            return;
        }
        self.settings = merge(&self.settings, id, patch);
        if self.load_status == LoadStatus::Loading {
            self.edited_since_load.insert(id.to_string());
        }
    }

    /// Re-enables a hidden widget. Returns `false` when `id` is unknown or
    /// already shown.
    pub fn restore(&mut self, id: &str) -> bool {
        match self.settings.get(id) {
            Some(entry) if !entry.enabled => {
                self.on_update(id, &WidgetPatch::enabled(true));
                true
            }
            _ => false,
        }
    }

    /// Widgets present in the mapping but disabled, in id order.
    pub fn hidden_ids(&self) -> Vec<&str> {
        self.settings
            .iter()
            .filter(|(_, s)| !s.enabled)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Builds the request persisting the whole mapping.
    pub fn save(&mut self) -> SaveRequest {
        info!(profile = %self.profile, widgets = self.settings.len(), "saving settings");
        self.save_status = SaveStatus::Saving;
        SaveRequest {
            profile: self.profile.clone(),
            settings: self.settings.clone(),
        }
    }

    /// Records the outcome of a save. Outcomes for a profile that is no
    /// longer active are logged only.
    pub fn save_finished(&mut self, profile: &ProfileName, result: Result<(), String>) -> bool {
        match &result {
            Ok(()) => info!(%profile, "settings saved"),
            Err(message) => warn!(%profile, error = %message, "settings save failed"),
        }
        if profile != &self.profile {
            return false;
        }
        self.save_status = match result {
            Ok(()) => SaveStatus::Saved,
            Err(message) => SaveStatus::Failed(message),
        };
        true
    }
}
