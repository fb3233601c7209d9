//! Widget renderers for the kitchen dashboard.
//!
//! This module defines the `Widget` trait implemented by every dashboard
//! widget, and the `WidgetRegistry` mapping widget ids to factories.
//!
//! # Architecture
//!
//! Widgets are stateless renderers. All state they show lives in
//! [`Feeds`], which the dashboard updates as timers fire and fetches
//! complete. Each widget receives a [`WidgetContext`] borrowing that state
//! and renders the body of its panel as ratatui `Line`s. Every
//! network-backed widget renders an explicit loading, error or empty state.
//!
//! # Example
//!
//! ```
//! use kitchen_dashboard::profile::ProfileName;
//! use kitchen_dashboard::widgets::{Feeds, WidgetContext, WidgetRegistry};
//!
//! let registry = WidgetRegistry::new();
//! let widget = registry.create("clock").expect("clock widget exists");
//! let feeds = Feeds::default();
//! let profile = ProfileName::default();
//! let lines = widget.render(40, &WidgetContext::new(&feeds, &profile));
//! assert_eq!(lines[0].to_string(), "--:--:--");
//! ```

pub mod calendar;
pub mod clock;
pub mod context;
pub mod feeds;
pub mod gallery;
pub mod photo;
pub mod weather;

pub use context::WidgetContext;
pub use feeds::{Feed, FeedData, Feeds};

use ratatui::style::{Color, Style};
use ratatui::text::Line;
use std::collections::HashMap;

use crate::remote::Remote;

pub const CLOCK_ID: &str = "clock";
pub const WEATHER_ID: &str = "weather";
pub const CALENDAR_ID: &str = "calendar";
pub const PHOTOS_ID: &str = "photos";
pub const PHOTO_ID: &str = "photo";

/// Trait for dashboard widgets.
///
/// Widgets must be thread-safe (`Send + Sync`) so the registry can be
/// shared with the render loop.
pub trait Widget: Send + Sync {
    /// Render the panel body.
    ///
    /// # Arguments
    ///
    /// * `width` - Available horizontal space in columns.
    /// * `context` - Shared state for rendering.
    fn render(&self, width: u16, context: &WidgetContext) -> Vec<Line<'static>>;

    /// Widget id as used in the settings mapping.
    fn id(&self) -> &'static str;

    /// Panel title.
    fn title(&self) -> &'static str;
}

/// Factory function type for creating widget instances.
pub type WidgetFactory = fn() -> Box<dyn Widget>;

/// Registry mapping widget ids to factory functions.
///
/// ```
/// use kitchen_dashboard::widgets::WidgetRegistry;
///
/// let registry = WidgetRegistry::new();
/// assert!(registry.create("weather").is_some());
/// assert!(registry.create("nonexistent").is_none());
/// ```
pub struct WidgetRegistry {
    factories: HashMap<&'static str, WidgetFactory>,
}

impl WidgetRegistry {
    /// Creates a registry with the built-in widgets: `clock`, `weather`,
    /// `calendar`, `photos` and `photo`.
    pub fn new() -> Self {
        let mut reg = Self {
            factories: HashMap::new(),
        };
        reg.register(CLOCK_ID, clock::create);
        reg.register(WEATHER_ID, weather::create);
        reg.register(CALENDAR_ID, calendar::create);
        reg.register(PHOTOS_ID, gallery::create);
        reg.register(PHOTO_ID, photo::create);
        reg
    }

    /// Register a widget factory for the given id.
    ///
    /// Overwrites any existing factory for the same id.
    pub fn register(&mut self, id: &'static str, factory: WidgetFactory) {
        self.factories.insert(id, factory);
    }

    /// Create a widget instance by id.
    ///
    /// Returns `None` if no factory is registered for the given id.
    pub fn create(&self, id: &str) -> Option<Box<dyn Widget>> {
        self.factories.get(id).map(|f| f())
    }

    /// All registered widget ids, sorted.
    pub fn available_ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self.factories.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Cuts `text` to at most `width` characters, marking the cut with `…`.
pub(crate) fn truncate(text: &str, width: u16) -> String {
    let width = usize::from(width);
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Body for the non-ready states of a remote feed, or `None` when ready.
pub(crate) fn remote_placeholder<T>(state: &Remote<T>) -> Option<Vec<Line<'static>>> {
    match state {
        Remote::Loading => Some(vec![Line::styled(
            "Loading...",
            Style::default().fg(Color::DarkGray),
        )]),
        Remote::Failed(message) => Some(vec![Line::styled(
            format!("Error: {message}"),
            Style::default().fg(Color::Red),
        )]),
        Remote::Ready(_) => None,
    }
}
