pub mod form_overlay;
pub mod header;
pub mod list_view;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;

use crate::util::unicode;

use super::app::{App, Mode};

/// Draw the whole screen for the current mode
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header + filter bar (2 rows) | list | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title line + filter bar
            Constraint::Min(1),    // task list
            Constraint::Length(1), // status row
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);
    list_view::render_list_view(frame, app, chunks[1]);

    // Form overlay (rendered on top of the list)
    if app.mode == Mode::Form {
        form_overlay::render_form_overlay(frame, app, chunks[1]);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Right-align `right` after `left` within `width` cells, if it fits.
pub(super) fn push_right_aligned<'a>(
    left: &mut Vec<Span<'a>>,
    right: Vec<Span<'a>>,
    width: usize,
    bg: Style,
) {
    let used = spans_width(left);
    let right_width = spans_width(&right);
    if used + right_width < width {
        left.push(Span::styled(" ".repeat(width - used - right_width), bg));
        left.extend(right);
    }
}
