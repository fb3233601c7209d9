//! Drawing of the render tree.
//!
//! Layout, top to bottom: profile bar, widget area, key hints, status line.
//! Widget panels flow left to right at their stored size and wrap onto the
//! next row when the terminal is too narrow.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::container::{MIN_DRAWN_COLS, MIN_DRAWN_ROWS};
use crate::render::{HeaderView, PanelView, RenderTree};

const HEADER_TEXT: &str = "Kitchen Dashboard";

const FOOTER_TEXT: &str =
    "[Tab] Focus  [x] Close  [z] Resize  [p] Profile  [s] Save  [r] Reload  [e] Restore  [i] Interval  [w] Photo  [q] Quit";

const EDIT_FOOTER_TEXT: &str = "[Enter] Apply  [Esc] Cancel  [Backspace] Delete";

const RESIZE_FOOTER_TEXT: &str = "[←→↑↓] Resize  [Enter] Apply  [Esc] Cancel";

/// Draws one frame.
pub fn draw(frame: &mut Frame, tree: &RenderTree) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // profile bar
            Constraint::Min(MIN_DRAWN_ROWS),
            Constraint::Length(1), // key hints
            Constraint::Length(1), // status
        ])
        .split(frame.area());

    frame.render_widget(Paragraph::new(header_line(&tree.header)), chunks[0]);

    let body = chunks[1];
    if tree.panels.is_empty() {
        let empty = Paragraph::new(Line::styled(
            "No widgets enabled for this profile.",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(empty, body);
    } else {
        let sizes: Vec<(u16, u16)> = tree.panels.iter().map(|p| (p.cols, p.rows)).collect();
        for (panel, rect) in tree.panels.iter().zip(flow_layout(body, &sizes)) {
            if let Some(rect) = rect {
                draw_panel(frame, panel, rect);
            }
        }
    }

    frame.render_widget(
        Paragraph::new(Line::styled(
            footer_text(tree),
            Style::default().fg(Color::DarkGray),
        )),
        chunks[2],
    );
    frame.render_widget(Paragraph::new(tree.status.clone()), chunks[3]);
}

fn header_line(header: &HeaderView) -> Line<'static> {
    let mut spans = vec![
        Span::styled(HEADER_TEXT, Style::default().fg(Color::Cyan)),
        Span::raw("  Profile: "),
    ];
    match &header.editing {
        Some(draft) => spans.push(Span::styled(
            format!("{draft}_"),
            Style::default().fg(Color::Yellow),
        )),
        None => spans.push(Span::styled(
            header.profile.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    }
    if !header.hidden.is_empty() {
        spans.push(Span::styled(
            format!("  Hidden: {}", header.hidden.join(", ")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn footer_text(tree: &RenderTree) -> &'static str {
    if tree.header.editing.is_some() {
        EDIT_FOOTER_TEXT
    } else if tree.panels.iter().any(|p| p.resizing) {
        RESIZE_FOOTER_TEXT
    } else {
        FOOTER_TEXT
    }
}

fn draw_panel(frame: &mut Frame, panel: &PanelView, rect: Rect) {
    let border = if panel.resizing {
        Style::default().fg(Color::Yellow)
    } else if panel.focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title = if panel.resizing {
        format!(" {} {}x{} ", panel.title, panel.cols, panel.rows)
    } else {
        format!(" {} ", panel.title)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title);
    frame.render_widget(Paragraph::new(panel.lines.clone()).block(block), rect);
}

/// Places panels of the given `(cols, rows)` sizes left to right inside
/// `area`, wrapping to a new row when a panel does not fit.
///
/// Panels wider than the area are narrowed to it. A panel that would start
/// below the area gets `None`; one that starts inside but overflows the
/// bottom is cut to the remaining height.
pub fn flow_layout(area: Rect, sizes: &[(u16, u16)]) -> Vec<Option<Rect>> {
    let mut placed = Vec::with_capacity(sizes.len());
    let (mut x, mut y) = (area.x, area.y);
    let mut row_height = 0u16;
    let bottom = area.y.saturating_add(area.height);
    let right = area.x.saturating_add(area.width);

    for &(cols, rows) in sizes {
        let width = cols.max(MIN_DRAWN_COLS).min(area.width);
        let height = rows.max(MIN_DRAWN_ROWS);

        if x > area.x && x.saturating_add(width) > right {
            x = area.x;
            y = y.saturating_add(row_height);
            row_height = 0;
        }
        if y >= bottom || width == 0 {
            placed.push(None);
            continue;
        }

        let height = height.min(bottom - y);
        placed.push(Some(Rect::new(x, y, width, height)));
        x = x.saturating_add(width);
        row_height = row_height.max(height);
    }
    placed
}
