//! Wire types for the dashboard backend API.
//!
//! These structures map to the JSON bodies exchanged with the backend.
//! Field names follow the backend's casing (`intervalMs`, `image_url`,
//! `dateTime`), handled through serde attributes.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Default panel width in pixels when the backend omits it.
pub const DEFAULT_WIDGET_WIDTH: u32 = 320;

/// Default panel height in pixels when the backend omits it.
pub const DEFAULT_WIDGET_HEIGHT: u32 = 160;

/// Identifier of a widget within a profile (`"clock"`, `"weather"`, ...).
pub type WidgetId = String;

/// Per-profile dictionary from widget id to its settings record.
pub type SettingsMapping = BTreeMap<WidgetId, WidgetSettings>;

/// Layout and behavior settings for a single widget.
///
/// Fields the client does not know about are kept in [`extra`](Self::extra)
/// and written back unchanged on save.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSettings {
    /// Whether the widget is shown.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Panel width in pixels.
    #[serde(default = "default_width", deserialize_with = "lenient_width")]
    pub width: u32,

    /// Panel height in pixels.
    #[serde(default = "default_height", deserialize_with = "lenient_height")]
    pub height: u32,

    /// Optional polling period for widgets that refresh their own content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval_ms: Option<u64>,

    /// Widget-specific fields preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_enabled() -> bool {
    true
}

fn default_width() -> u32 {
    DEFAULT_WIDGET_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_WIDGET_HEIGHT
}

/// Reads a pixel size written by any client of the shared profile.
///
/// Fractional numbers are rounded and clamped into `u32`. Anything that is
/// not a number (`null`, strings, objects) yields `fallback` so that one bad
/// entry never fails the whole mapping.
fn lenient_pixels<'de, D>(deserializer: D, fallback: u32) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let pixels = match value.as_f64() {
        Some(n) if n.is_finite() => n.round().clamp(0.0, f64::from(u32::MAX)) as u32,
        _ => {
            tracing::debug!(%value, fallback, "ignoring non-numeric widget size");
            fallback
        }
    };
    Ok(pixels)
}

fn lenient_width<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    lenient_pixels(deserializer, DEFAULT_WIDGET_WIDTH)
}

fn lenient_height<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    lenient_pixels(deserializer, DEFAULT_WIDGET_HEIGHT)
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            width: DEFAULT_WIDGET_WIDTH,
            height: DEFAULT_WIDGET_HEIGHT,
            refresh_interval_ms: None,
            extra: Map::new(),
        }
    }
}

/// Body of `POST /api/widgets/settings`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SaveSettingsRequest<'a> {
    /// Profile the mapping belongs to.
    pub profile: &'a str,
    /// Full mapping for the profile.
    pub settings: &'a SettingsMapping,
}

/// Current weather as reported by `GET /api/weather`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Weather {
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Human-readable condition (e.g. `"light rain"`).
    pub condition: String,
}

/// A calendar entry from `GET /api/calendar`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    /// Event title. The backend substitutes `"No Title"` when absent.
    #[serde(default = "default_summary")]
    pub summary: String,
    /// Event start.
    pub start: EventStart,
}

fn default_summary() -> String {
    "No Title".to_string()
}

/// Start of a calendar event.
///
/// Timed events carry `{ "dateTime": ... }`, all-day events `{ "date": ... }`.
/// Some backend versions flatten the start into a plain string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EventStart {
    /// Timed event start.
    DateTime {
        /// RFC 3339 timestamp as sent by the backend.
        #[serde(rename = "dateTime")]
        date_time: String,
    },
    /// All-day event start.
    Date {
        /// Calendar date (`YYYY-MM-DD`).
        date: String,
    },
    /// Start already flattened to a string.
    Raw(String),
}

impl EventStart {
    /// Returns the start as sent by the backend, without reformatting.
    pub fn as_str(&self) -> &str {
        match self {
            EventStart::DateTime { date_time } => date_time,
            EventStart::Date { date } => date,
            EventStart::Raw(s) => s,
        }
    }
}

/// Calendar payload, either a bare list or the `{ "events": [...] }` wrapper.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub(crate) enum CalendarPayload {
    List(Vec<CalendarEvent>),
    Wrapped {
        events: Vec<CalendarEvent>,
        #[serde(default)]
        message: Option<String>,
    },
}

/// Calendar events in server order, with the backend's note when present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarFeed {
    /// Events in the order the server returned them.
    pub events: Vec<CalendarEvent>,
    /// Informational message (e.g. `"No upcoming events."`).
    pub message: Option<String>,
}

impl From<CalendarPayload> for CalendarFeed {
    fn from(payload: CalendarPayload) -> Self {
        match payload {
            CalendarPayload::List(events) => Self {
                events,
                message: None,
            },
            CalendarPayload::Wrapped { events, message } => Self { events, message },
        }
    }
}

/// A photo entry from `GET /api/photos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Photo {
    /// Location of the image.
    pub url: String,
}

/// Response of `GET /api/onedrive-image`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OneDriveImage {
    /// Location of the current image, if the backend has one.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Response of `GET /api/photo-widget-settings`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhotoWidgetSettings {
    /// Polling period in milliseconds.
    #[serde(default)]
    pub interval_ms: Option<u64>,
    /// Panel width in pixels.
    #[serde(default)]
    pub width: Option<u32>,
    /// Panel height in pixels.
    #[serde(default)]
    pub height: Option<u32>,
}

/// Body of `POST /api/photo-widget-settings`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavePhotoSettingsRequest {
    /// Profile the settings belong to.
    pub profile: String,
    /// Polling period in milliseconds.
    pub interval_ms: u64,
    /// Panel width in pixels.
    pub width: u32,
    /// Panel height in pixels.
    pub height: u32,
}

/// Error body some backend routes return instead of their payload.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
