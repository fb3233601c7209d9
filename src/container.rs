//! Widget Container: close and resize affordances around one widget.
//!
//! A container never mutates settings itself. It turns user gestures into
//! `(id, patch)` updates for the App Shell, which owns the mapping.

use dashboard_api::{WidgetId, WidgetSettings};

use crate::settings::WidgetPatch;

/// Width of one terminal cell in settings pixels.
pub const CELL_WIDTH_PX: u32 = 8;

/// Height of one terminal cell in settings pixels.
pub const CELL_HEIGHT_PX: u32 = 16;

/// Smallest panel drawn, in columns. Stored sizes are not clamped.
pub const MIN_DRAWN_COLS: u16 = 8;

/// Smallest panel drawn, in rows (border plus one line).
pub const MIN_DRAWN_ROWS: u16 = 3;

/// Converts a stored pixel size into the terminal cells the panel occupies.
pub fn px_to_cells(width: u32, height: u32) -> (u16, u16) {
    let cols = u16::try_from(width / CELL_WIDTH_PX).unwrap_or(u16::MAX);
    let rows = u16::try_from(height / CELL_HEIGHT_PX).unwrap_or(u16::MAX);
    (cols.max(MIN_DRAWN_COLS), rows.max(MIN_DRAWN_ROWS))
}

/// A widget id bound to its current settings.
#[derive(Debug, Clone, Copy)]
pub struct WidgetContainer<'a> {
    id: &'a str,
    settings: &'a WidgetSettings,
}

impl<'a> WidgetContainer<'a> {
    pub fn new(id: &'a str, settings: &'a WidgetSettings) -> Self {
        Self { id, settings }
    }

    pub fn id(&self) -> &'a str {
        self.id
    }

    pub fn settings(&self) -> &'a WidgetSettings {
        self.settings
    }

    /// Whether the child widget is rendered.
    pub fn is_mounted(&self) -> bool {
        self.settings.enabled
    }

    /// Close button: hides the widget.
    pub fn close(&self) -> (WidgetId, WidgetPatch) {
        (self.id.to_string(), WidgetPatch::enabled(false))
    }

    /// End of a resize gesture: stores the new size as given.
    pub fn resize_stop(&self, width: u32, height: u32) -> (WidgetId, WidgetPatch) {
        (self.id.to_string(), WidgetPatch::size(width, height))
    }

    /// Panel size in terminal cells.
    pub fn cells(&self) -> (u16, u16) {
        px_to_cells(self.settings.width, self.settings.height)
    }

    /// Starts a resize gesture from the stored size.
    pub fn begin_resize(&self) -> ResizeDraft {
        ResizeDraft {
            id: self.id.to_string(),
            width: self.settings.width,
            height: self.settings.height,
        }
    }
}

/// Size being dragged during a resize gesture, in pixels.
///
/// The gesture ends through [`WidgetContainer::resize_stop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeDraft {
    id: WidgetId,
    width: u32,
    height: u32,
}

impl ResizeDraft {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Grows or shrinks the draft by whole cells, never below one cell.
    pub fn resize_by(&mut self, cols: i16, rows: i16) {
        self.width = step(self.width, cols, CELL_WIDTH_PX);
        self.height = step(self.height, rows, CELL_HEIGHT_PX);
    }

    /// Draft size in terminal cells.
    pub fn cells(&self) -> (u16, u16) {
        px_to_cells(self.width, self.height)
    }
}

fn step(value: u32, cells: i16, cell_px: u32) -> u32 {
    let delta = i64::from(cells) * i64::from(cell_px);
    let next = (i64::from(value) + delta).max(i64::from(cell_px));
    u32::try_from(next).unwrap_or(u32::MAX)
}
