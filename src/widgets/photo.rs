//! OneDrive photo widget.
//!
//! Unlike the other feeds, the photo widget polls on its own interval and
//! keeps its own settings (`intervalMs`, `width`, `height`) on a separate
//! backend endpoint. [`PhotoState`] holds that state; [`PhotoWidget`]
//! renders it.

use dashboard_api::{OneDriveImage, PhotoWidgetSettings, SavePhotoSettingsRequest};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use super::{truncate, Widget, WidgetContext, PHOTO_ID};
use crate::profile::ProfileName;

/// Polling period used until settings say otherwise.
pub const DEFAULT_INTERVAL_MS: u64 = 60_000;

/// Smallest interval accepted from the interval editor, in seconds.
pub const MIN_INTERVAL_SECS: u64 = 5;

pub const DEFAULT_WIDTH: u32 = 400;
pub const DEFAULT_HEIGHT: u32 = 300;

/// Shown when no image has loaded and the last fetch failed.
pub const LOAD_FAILED: &str = "Image load failed.";

/// Shown before the first image arrives.
pub const LOADING: &str = "Loading...";

/// Parses interval editor input (seconds) into milliseconds.
///
/// Values under [`MIN_INTERVAL_SECS`] are raised to it. Returns `None`
/// for input that is not a whole number.
pub fn parse_interval_secs(input: &str) -> Option<u64> {
    let secs: u64 = input.trim().parse().ok()?;
    Some(secs.max(MIN_INTERVAL_SECS).saturating_mul(1000))
}

/// What the photo panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoView<'a> {
    Image(&'a str),
    Failed,
    Loading,
}

/// Image, polling interval and size of the photo widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoState {
    image_url: Option<String>,
    failed: bool,
    image_issued: u64,
    image_applied: u64,
    settings_issued: u64,
    interval_ms: u64,
    width: u32,
    height: u32,
    interval_draft: Option<String>,
}

impl Default for PhotoState {
    fn default() -> Self {
        Self {
            image_url: None,
            failed: false,
            image_issued: 0,
            image_applied: 0,
            settings_issued: 0,
            interval_ms: DEFAULT_INTERVAL_MS,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            interval_draft: None,
        }
    }
}

impl PhotoState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Last successfully loaded image location.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn view(&self) -> PhotoView<'_> {
        match (&self.image_url, self.failed) {
            (Some(url), _) => PhotoView::Image(url),
            (None, true) => PhotoView::Failed,
            (None, false) => PhotoView::Loading,
        }
    }

    /// Registers an image fetch and returns its sequence number.
    pub fn begin_image(&mut self) -> u64 {
        self.image_issued += 1;
        self.image_issued
    }

    /// Applies an image response unless a newer one was already applied.
    ///
    /// A response without `image_url` changes nothing. A failure keeps the
    /// last image.
    pub fn image_loaded(&mut self, seq: u64, result: Result<OneDriveImage, String>) -> bool {
        if seq <= self.image_applied || seq > self.image_issued {
            return false;
        }
        self.image_applied = seq;
        match result {
            Ok(OneDriveImage {
                image_url: Some(url),
            }) => {
                self.image_url = Some(url);
                self.failed = false;
            }
            Ok(OneDriveImage { image_url: None }) => {}
            Err(_) => self.failed = true,
        }
        true
    }

    /// Registers a settings read and returns its sequence number.
    pub fn begin_settings(&mut self) -> u64 {
        self.settings_issued += 1;
        self.settings_issued
    }

    /// Applies a settings response if it is the latest read.
    ///
    /// A zero or missing interval is ignored, and the size is only taken
    /// when both dimensions are present. Failures change nothing. Returns
    /// whether the interval changed.
    pub fn settings_loaded(&mut self, seq: u64, result: Result<PhotoWidgetSettings, String>) -> bool {
        if seq != self.settings_issued {
            return false;
        }
        let Ok(settings) = result else {
            return false;
        };
        if let (Some(width), Some(height)) = (settings.width, settings.height) {
            if width > 0 && height > 0 {
                self.width = width;
                self.height = height;
            }
        }
        match settings.interval_ms {
            Some(ms) if ms > 0 => self.set_interval(ms),
            _ => false,
        }
    }

    /// Sets the polling period. Returns whether it changed.
    pub fn set_interval(&mut self, interval_ms: u64) -> bool {
        let changed = self.interval_ms != interval_ms;
        self.interval_ms = interval_ms;
        changed
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Drops in-flight responses, e.g. when the widget unmounts.
    pub fn invalidate(&mut self) {
        self.image_applied = self.image_issued;
        self.settings_issued += 1;
        self.interval_draft = None;
    }

    /// Starts editing the interval, seeded with the current value in seconds.
    pub fn begin_interval_edit(&mut self) {
        self.interval_draft = Some((self.interval_ms / 1000).to_string());
    }

    pub fn interval_draft(&self) -> Option<&str> {
        self.interval_draft.as_deref()
    }

    /// Appends a digit to the interval draft. Other characters are ignored.
    pub fn input(&mut self, c: char) {
        if let Some(draft) = self.interval_draft.as_mut() {
            if c.is_ascii_digit() {
                draft.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(draft) = self.interval_draft.as_mut() {
            draft.pop();
        }
    }

    pub fn cancel_interval_edit(&mut self) {
        self.interval_draft = None;
    }

    /// Ends the edit and applies the drafted interval.
    ///
    /// Returns the new interval in milliseconds when it changed.
    pub fn commit_interval(&mut self) -> Option<u64> {
        let draft = self.interval_draft.take()?;
        let interval_ms = parse_interval_secs(&draft)?;
        self.set_interval(interval_ms).then_some(interval_ms)
    }

    /// Body for `POST /api/photo-widget-settings`.
    pub fn save_request(&self, profile: &ProfileName) -> SavePhotoSettingsRequest {
        SavePhotoSettingsRequest {
            profile: profile.as_str().to_string(),
            interval_ms: self.interval_ms,
            width: self.width,
            height: self.height,
        }
    }
}

/// Renders the current OneDrive image location and refresh interval.
pub struct PhotoWidget;

impl Widget for PhotoWidget {
    fn render(&self, width: u16, ctx: &WidgetContext) -> Vec<Line<'static>> {
        let photo = &ctx.feeds.photo;
        let first = match photo.view() {
            PhotoView::Image(url) => Line::raw(truncate(url, width)),
            PhotoView::Failed => Line::styled(LOAD_FAILED, Style::default().fg(Color::Red)),
            PhotoView::Loading => Line::styled(LOADING, Style::default().fg(Color::DarkGray)),
        };
        let interval = match photo.interval_draft() {
            Some(draft) => Line::from(vec![
                Span::raw("Refresh every "),
                Span::styled(format!("{draft}_"), Style::default().fg(Color::Yellow)),
                Span::raw(" s"),
            ]),
            None => Line::styled(
                format!("Refresh every {} s", photo.interval_ms() / 1000),
                Style::default().fg(Color::DarkGray),
            ),
        };
        let mut lines = vec![first, interval];
        if ctx.focused && photo.interval_draft().is_none() {
            lines.push(Line::styled(
                "i: interval  w: save settings",
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines
    }

    fn id(&self) -> &'static str {
        PHOTO_ID
    }

    fn title(&self) -> &'static str {
        "OneDrive Photo"
    }
}

pub fn create() -> Box<dyn Widget> {
    Box::new(PhotoWidget)
}
