//! Widget context providing shared state for widget rendering.
//!
//! The [`WidgetContext`] borrows the feed state and the active profile for
//! the duration of one render pass.

use super::Feeds;
use crate::profile::ProfileName;

/// Shared context passed to widgets during rendering.
///
/// All fields are borrowed so building a context per frame costs nothing.
#[derive(Debug, Clone, Copy)]
pub struct WidgetContext<'a> {
    /// Network and timer state for every feed.
    pub feeds: &'a Feeds,

    /// Active profile.
    pub profile: &'a ProfileName,

    /// Whether the panel being rendered has focus.
    pub focused: bool,
}

impl<'a> WidgetContext<'a> {
    /// Creates an unfocused context.
    pub fn new(feeds: &'a Feeds, profile: &'a ProfileName) -> Self {
        Self {
            feeds,
            profile,
            focused: false,
        }
    }

    /// Marks the panel as focused.
    pub fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}
