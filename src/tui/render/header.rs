use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

use super::push_right_aligned;

/// Render the board title line and the filter bar beneath it
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = Style::default().bg(app.theme.background);
    let width = area.width as usize;
    let view = app.visible();
    let total = app.board.store.tasks().len();

    // Title line: name, count chip, search
    let mut title = vec![
        Span::styled(
            format!(" {} ", app.board.config.board.name),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.background)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", view.len()),
            Style::default().fg(app.theme.background).bg(app.theme.highlight),
        ),
    ];
    if view.fell_back {
        title.push(Span::styled(
            "  no matches, showing all",
            Style::default().fg(app.theme.yellow).bg(app.theme.background),
        ));
    } else if view.len() < total {
        title.push(Span::styled(
            format!("  of {}", total),
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        ));
    }
    if let Some(term) = app.view.search_term() {
        push_right_aligned(
            &mut title,
            vec![Span::styled(
                format!("/{} ", term),
                Style::default().fg(app.theme.cyan).bg(app.theme.background),
            )],
            width,
            bg,
        );
    }

    // Filter bar: one chip per dimension, active ones highlighted
    let category = app.view.category.as_deref().unwrap_or("all");
    let priority = app.view.priority.map_or("all", |p| p.as_str());
    let chips = [
        ("s", "sort", app.view.sort.label(), false),
        ("c", "category", category, app.view.category.is_some()),
        ("p", "priority", priority, app.view.priority.is_some()),
        (
            "f",
            "status",
            app.view.status.as_str(),
            app.view.status != crate::model::view::StatusFilter::All,
        ),
    ];
    let mut filters = vec![Span::styled(" ", bg)];
    for (key, label, value, active) in chips {
        let value_style = if active {
            Style::default().fg(app.theme.highlight).bg(app.theme.background)
        } else {
            Style::default().fg(app.theme.text).bg(app.theme.background)
        };
        filters.push(Span::styled(
            format!("{}:", key),
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        ));
        filters.push(Span::styled(
            format!("{} ", label),
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        ));
        filters.push(Span::styled(value.to_string(), value_style));
        filters.push(Span::styled("   ", bg));
    }

    let paragraph = Paragraph::new(vec![Line::from(title), Line::from(filters)]).style(bg);
    frame.render_widget(paragraph, area);
}
