//! Photos widget: the gallery from `/api/photos`, one location per line.

use ratatui::style::{Color, Style};
use ratatui::text::Line;

use super::{remote_placeholder, truncate, Widget, WidgetContext, PHOTOS_ID};

pub struct GalleryWidget;

impl Widget for GalleryWidget {
    fn render(&self, width: u16, ctx: &WidgetContext) -> Vec<Line<'static>> {
        let state = ctx.feeds.photos.state();
        if let Some(lines) = remote_placeholder(state) {
            return lines;
        }
        match state.ready() {
            Some(photos) if photos.is_empty() => vec![Line::styled(
                "No photos.",
                Style::default().fg(Color::DarkGray),
            )],
            Some(photos) => photos
                .iter()
                .map(|photo| Line::raw(truncate(&photo.url, width)))
                .collect(),
            None => Vec::new(),
        }
    }

    fn id(&self) -> &'static str {
        PHOTOS_ID
    }

    fn title(&self) -> &'static str {
        "Photos"
    }
}

pub fn create() -> Box<dyn Widget> {
    Box::new(GalleryWidget)
}
