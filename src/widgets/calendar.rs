//! Calendar widget: upcoming events in server order.

use ratatui::style::{Color, Style};
use ratatui::text::Line;

use super::{remote_placeholder, truncate, Widget, WidgetContext, CALENDAR_ID};

/// Shown for an empty event list without a server message.
const NO_EVENTS: &str = "No upcoming events.";

pub struct CalendarWidget;

impl Widget for CalendarWidget {
    fn render(&self, width: u16, ctx: &WidgetContext) -> Vec<Line<'static>> {
        let state = ctx.feeds.calendar.state();
        if let Some(lines) = remote_placeholder(state) {
            return lines;
        }
        let Some(feed) = state.ready() else {
            return Vec::new();
        };
        if feed.events.is_empty() {
            let message = feed.message.as_deref().unwrap_or(NO_EVENTS);
            return vec![Line::styled(
                truncate(message, width),
                Style::default().fg(Color::DarkGray),
            )];
        }
        feed.events
            .iter()
            .map(|event| {
                let text = format!("{} at {}", event.summary, event.start.as_str());
                Line::raw(truncate(&text, width))
            })
            .collect()
    }

    fn id(&self) -> &'static str {
        CALENDAR_ID
    }

    fn title(&self) -> &'static str {
        "Calendar"
    }
}

pub fn create() -> Box<dyn Widget> {
    Box::new(CalendarWidget)
}
