//! Pure projection of the dashboard state into what is drawn.
//!
//! [`render_tree`] walks the mounted widgets in id order and produces one
//! [`PanelView`] per widget, with its size in terminal cells and its body
//! already rendered. Disabled widgets never reach the tree. The terminal
//! front end only lays out and draws the result.

use ratatui::style::{Color, Style};
use ratatui::text::Line;

use crate::container::WidgetContainer;
use crate::dashboard::{Dashboard, Mode};
use crate::shell::{LoadStatus, SaveStatus};
use crate::widgets::{WidgetContext, WidgetRegistry};

/// Body shown for ids without a registered widget.
pub const UNKNOWN_WIDGET: &str = "Unknown widget";

/// Profile bar.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderView {
    pub profile: String,
    /// Profile name being typed, if the editor is open.
    pub editing: Option<String>,
    pub load: LoadStatus,
    pub save: SaveStatus,
    /// Disabled widgets that can be restored.
    pub hidden: Vec<String>,
}

/// One widget panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub id: String,
    pub title: String,
    pub cols: u16,
    pub rows: u16,
    pub focused: bool,
    pub resizing: bool,
    pub lines: Vec<Line<'static>>,
}

/// Everything the front end draws for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTree {
    pub header: HeaderView,
    pub panels: Vec<PanelView>,
    pub status: Line<'static>,
}

impl RenderTree {
    /// Panel for `id`, if mounted.
    pub fn panel(&self, id: &str) -> Option<&PanelView> {
        self.panels.iter().find(|p| p.id == id)
    }
}

/// Builds the render tree for the current state.
pub fn render_tree(dashboard: &Dashboard, registry: &WidgetRegistry) -> RenderTree {
    let shell = dashboard.shell();
    let header = HeaderView {
        profile: shell.profile().to_string(),
        editing: dashboard.profile_manager().draft().map(str::to_string),
        load: shell.load_status().clone(),
        save: shell.save_status().clone(),
        hidden: shell.hidden_ids().into_iter().map(str::to_string).collect(),
    };

    let resize = match dashboard.mode() {
        Mode::Resize(draft) => Some(draft),
        _ => None,
    };

    let panels = shell
        .settings()
        .iter()
        .map(|(id, settings)| WidgetContainer::new(id, settings))
        .filter(|container| container.is_mounted())
        .map(|container| {
            let id = container.id();
            let focused = dashboard.focus() == Some(id);
            let draft = resize.filter(|d| d.id() == id);
            let (cols, rows) = draft.map_or_else(|| container.cells(), |d| d.cells());
            let inner_width = cols.saturating_sub(2);
            let ctx = WidgetContext::new(dashboard.feeds(), shell.profile()).with_focus(focused);
            let (title, lines) = match registry.create(id) {
                Some(widget) => (widget.title().to_string(), widget.render(inner_width, &ctx)),
                None => (
                    id.to_string(),
                    vec![Line::styled(
                        UNKNOWN_WIDGET,
                        Style::default().fg(Color::DarkGray),
                    )],
                ),
            };
            PanelView {
                id: id.to_string(),
                title,
                cols,
                rows,
                focused,
                resizing: draft.is_some(),
                lines,
            }
        })
        .collect();

    RenderTree {
        header,
        panels,
        status: status_line(dashboard),
    }
}

fn status_line(dashboard: &Dashboard) -> Line<'static> {
    let shell = dashboard.shell();
    let mut parts: Vec<String> = Vec::new();
    if *shell.load_status() != LoadStatus::Ready {
        parts.push(shell.load_status().to_string());
    }
    if *shell.save_status() != SaveStatus::Idle {
        parts.push(shell.save_status().to_string());
    }
    if let Some(notice) = dashboard.notice() {
        parts.push(notice.to_string());
    }

    let failed = matches!(shell.load_status(), LoadStatus::Failed(_))
        || matches!(shell.save_status(), SaveStatus::Failed(_));
    let style = if failed {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Yellow)
    };
    Line::styled(parts.join("  |  "), style)
}
