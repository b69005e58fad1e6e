use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode::truncate_to_width;

use super::push_right_aligned;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let line = match app.mode {
        Mode::Navigate => {
            let mut spans = Vec::new();
            if let Some(msg) = &app.message {
                spans.push(Span::styled(
                    format!(" {}", msg),
                    Style::default().fg(app.theme.green).bg(bg),
                ));
            }
            let hint = "a add  e edit  d delete  space done  / search  q quit ";
            push_right_aligned(&mut spans, vec![Span::styled(hint, dim)], width, bg_style);
            Line::from(spans)
        }
        Mode::Search => {
            // Search prompt: /pattern▌
            let mut spans = vec![
                Span::styled(
                    format!("/{}", app.view.search),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)), // ▌ cursor
            ];
            push_right_aligned(
                &mut spans,
                vec![Span::styled("Enter keep  Esc clear", dim)],
                width,
                bg_style,
            );
            Line::from(spans)
        }
        Mode::ConfirmDelete => {
            let title = app
                .pending_delete
                .as_ref()
                .and_then(|id| app.board.store.get(id))
                .map(|t| t.title.as_str())
                .unwrap_or("");
            Line::from(vec![
                Span::styled(
                    format!(
                        " Delete \"{}\"? ",
                        truncate_to_width(title, width.saturating_sub(20))
                    ),
                    Style::default().fg(app.theme.red).bg(bg),
                ),
                Span::styled("y to confirm, any key to cancel", dim),
            ])
        }
        Mode::Form => match &app.message {
            Some(msg) => Line::from(Span::styled(
                format!(" {}", msg),
                Style::default().fg(app.theme.green).bg(bg),
            )),
            None => Line::from(Span::styled(" ".repeat(width), bg_style)),
        },
    };

    let paragraph = Paragraph::new(line).style(bg_style);
    frame.render_widget(paragraph, area);
}
