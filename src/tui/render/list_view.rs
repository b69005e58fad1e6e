use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::task::Task;
use crate::model::timestamp::display_local;
use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

use super::spans_width;

/// Render the processed task list, one row per task
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = Style::default().bg(app.theme.background);
    let height = area.height as usize;

    if app.board.store.tasks().is_empty() {
        let hint = Line::from(vec![
            Span::styled(
                "  No tasks yet. Press ",
                Style::default().fg(app.theme.dim).bg(app.theme.background),
            ),
            Span::styled(
                "a",
                Style::default().fg(app.theme.highlight).bg(app.theme.background),
            ),
            Span::styled(
                " to add one.",
                Style::default().fg(app.theme.dim).bg(app.theme.background),
            ),
        ]);
        frame.render_widget(Paragraph::new(vec![Line::default(), hint]).style(bg), area);
        return;
    }

    // Keep the cursor on screen
    if height > 0 {
        if app.cursor < app.scroll_offset {
            app.scroll_offset = app.cursor;
        } else if app.cursor >= app.scroll_offset + height {
            app.scroll_offset = app.cursor + 1 - height;
        }
    }

    let app = &*app;
    let view = app.visible();
    let lines: Vec<Line> = view
        .tasks
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(height)
        .map(|(idx, task)| task_line(app, task, idx == app.cursor, area.width as usize))
        .collect();

    frame.render_widget(Paragraph::new(lines).style(bg), area);
}

fn task_line(app: &App, task: &Task, is_cursor: bool, width: usize) -> Line<'static> {
    let theme = &app.theme;
    let row_bg = if is_cursor {
        theme.selection_bg
    } else {
        theme.background
    };
    let base = Style::default().bg(row_bg);

    // Right side: date, category, priority
    let right = vec![
        Span::styled(
            display_local(&task.timestamp),
            base.fg(theme.dim),
        ),
        Span::styled(format!("  {}", task.category), base.fg(theme.cyan)),
        Span::styled(
            format!("  {:<6}", task.priority.as_str()),
            base.fg(theme.priority_color(task.priority)),
        ),
    ];
    let right_width = spans_width(&right);

    let marker = if is_cursor { "\u{258E}" } else { " " }; // ▎
    let check = if task.completed { "[x] " } else { "[ ] " };
    let mut left = vec![
        Span::styled(marker, base.fg(theme.selection_border)),
        Span::styled(check, base.fg(theme.text)),
    ];

    let title_budget = width.saturating_sub(spans_width(&left) + right_width + 2);
    let title = truncate_to_width(&task.title, title_budget);
    let mut title_style = if task.completed {
        base.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
    } else {
        base.fg(theme.text_bright)
    };
    if is_cursor {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }
    let title_width = display_width(&title);
    left.push(Span::styled(title, title_style));

    if let Some(desc) = &task.description {
        let first_line = desc.lines().next().unwrap_or("");
        let desc_budget = title_budget.saturating_sub(title_width + 2);
        if desc_budget > 1 && !first_line.is_empty() {
            left.push(Span::styled(
                format!("  {}", truncate_to_width(first_line, desc_budget)),
                base.fg(theme.dim),
            ));
        }
    }

    let used = spans_width(&left);
    let pad = width.saturating_sub(used + right_width);
    left.push(Span::styled(" ".repeat(pad), base));
    left.extend(right);
    Line::from(left)
}
