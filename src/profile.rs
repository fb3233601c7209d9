//! Profile names and the profile manager control.
//!
//! A profile is a free-form name selecting which settings mapping is
//! active. The [`ProfileManager`] buffers edits to the name and turns a
//! confirmed edit into a [`ProfileCommand`] for the App Shell.

use std::fmt;
use std::str::FromStr;

/// Name of a settings profile.
///
/// Surrounding whitespace is trimmed and empty names are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProfileName(String);

impl ProfileName {
    /// Profile used when none is configured.
    pub const DEFAULT: &'static str = "default";

    /// Creates a profile name, returning `None` for blank input.
    pub fn new(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The name as sent to the backend.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProfileName {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when parsing a blank profile name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyProfileName;

impl fmt::Display for EmptyProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "profile name must not be empty")
    }
}

impl std::error::Error for EmptyProfileName {}

impl FromStr for ProfileName {
    type Err = EmptyProfileName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or(EmptyProfileName)
    }
}

/// Request produced by the profile manager for the App Shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileCommand {
    /// Switch to another profile (reloads its settings).
    Switch(ProfileName),
    /// Persist the current mapping under the current profile.
    Save,
}

/// Profile name editor with an explicit save control.
///
/// Holds only the edit buffer; the active profile lives in the App Shell
/// and is passed in where needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileManager {
    draft: Option<String>,
}

impl ProfileManager {
    /// Creates a manager with no edit in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts editing, seeding the buffer with the current name.
    pub fn begin_edit(&mut self, current: &ProfileName) {
        self.draft = Some(current.as_str().to_string());
    }

    /// Whether an edit is in progress.
    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    /// Current edit buffer, if editing.
    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }

    /// Appends a character to the edit buffer.
    pub fn input(&mut self, c: char) {
        if let Some(draft) = self.draft.as_mut() {
            draft.push(c);
        }
    }

    /// Removes the last character of the edit buffer.
    pub fn backspace(&mut self) {
        if let Some(draft) = self.draft.as_mut() {
            draft.pop();
        }
    }

    /// Abandons the edit.
    pub fn cancel(&mut self) {
        self.draft = None;
    }

    /// Ends the edit and returns a switch command when the name changed.
    ///
    /// Blank names and the current name produce no command.
    pub fn commit(&mut self, current: &ProfileName) -> Option<ProfileCommand> {
        let draft = self.draft.take()?;
        let name = ProfileName::new(&draft)?;
        if &name == current {
            return None;
        }
        Some(ProfileCommand::Switch(name))
    }

    /// The save control.
    pub fn save(&self) -> ProfileCommand {
        ProfileCommand::Save
    }
}
