//! Clock widget: local time as `HH:MM:SS`.

use chrono::NaiveTime;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;

use super::{Widget, WidgetContext, CLOCK_ID};

/// Shown until the first timer tick.
const NO_TIME: &str = "--:--:--";

/// Formats a time as zero-padded `HH:MM:SS`.
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

pub struct ClockWidget;

impl Widget for ClockWidget {
    fn render(&self, _width: u16, ctx: &WidgetContext) -> Vec<Line<'static>> {
        let text = ctx
            .feeds
            .clock
            .map(format_time)
            .unwrap_or_else(|| NO_TIME.to_string());
        vec![Line::styled(text, Style::default().add_modifier(Modifier::BOLD))]
    }

    fn id(&self) -> &'static str {
        CLOCK_ID
    }

    fn title(&self) -> &'static str {
        "Clock"
    }
}

pub fn create() -> Box<dyn Widget> {
    Box::new(ClockWidget)
}
