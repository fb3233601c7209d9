//! Weather widget: temperature and condition from `/api/weather`.

use ratatui::style::{Modifier, Style};
use ratatui::text::Line;

use super::{remote_placeholder, truncate, Widget, WidgetContext, WEATHER_ID};

pub struct WeatherWidget;

impl Widget for WeatherWidget {
    fn render(&self, width: u16, ctx: &WidgetContext) -> Vec<Line<'static>> {
        let state = ctx.feeds.weather.state();
        if let Some(lines) = remote_placeholder(state) {
            return lines;
        }
        let Some(weather) = state.ready() else {
            return Vec::new();
        };
        vec![
            Line::styled(
                format!("{}°C", weather.temperature),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Line::raw(truncate(&weather.condition, width)),
        ]
    }

    fn id(&self) -> &'static str {
        WEATHER_ID
    }

    fn title(&self) -> &'static str {
        "Weather"
    }
}

pub fn create() -> Box<dyn Widget> {
    Box::new(WeatherWidget)
}
