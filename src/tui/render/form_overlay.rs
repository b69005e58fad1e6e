use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, FormField, FormState};
use crate::util::unicode::{display_width, pad_to_width, truncate_to_width};

const LABEL_W: usize = 10;
const CURSOR: &str = "\u{258C}"; // ▌

/// Render the create/edit form centered over `area`
pub fn render_form_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = app.form.as_ref() else {
        return;
    };
    let popup_w: u16 = 64.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;

    let bg = app.theme.background;
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::default());
    for field in FormField::ALL {
        lines.push(field_line(app, form, field, inner_w));
    }

    if form.editor.adding_category {
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled(pad_to_width(" New cat.", LABEL_W + 1), dim_style),
            Span::styled(
                form.editor.category_input.clone(),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ),
            Span::styled(CURSOR, Style::default().fg(app.theme.highlight).bg(bg)),
        ]));
    }

    lines.push(Line::default());
    match &form.error {
        Some(err) => lines.push(Line::from(Span::styled(
            format!(" {}", truncate_to_width(err, inner_w.saturating_sub(1))),
            Style::default().fg(app.theme.red).bg(bg),
        ))),
        None => lines.push(Line::default()),
    }
    let hint = if form.editor.adding_category {
        " Enter add  Esc back"
    } else {
        " Tab next  \u{2190}/\u{2192} change  Enter save  ^R cancel  Esc close"
    };
    lines.push(Line::from(Span::styled(
        truncate_to_width(hint, inner_w),
        dim_style,
    )));

    let popup_h = ((lines.len() as u16) + 2).min(area.height);
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let title = if form.editor.is_editing() {
        " Edit task "
    } else {
        " New task "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title,
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(text_style);

    frame.render_widget(Paragraph::new(lines).block(block).style(text_style), overlay_area);
}

fn field_line(app: &App, form: &FormState, field: FormField, inner_w: usize) -> Line<'static> {
    let bg = app.theme.background;
    let focused = form.field == field && !form.editor.adding_category;
    let label_style = if focused {
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(bg)
    };
    let value_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let marker = if focused { "\u{25B8}" } else { " " }; // ▸

    let mut spans = vec![
        Span::styled(marker, label_style),
        Span::styled(pad_to_width(field.label(), LABEL_W), label_style),
    ];
    let budget = inner_w.saturating_sub(LABEL_W + 2);
    let draft = &form.editor.draft;

    match field {
        FormField::Timestamp | FormField::Title | FormField::Description => {
            let text = match field {
                FormField::Timestamp => &draft.timestamp,
                FormField::Title => &draft.title,
                _ => &draft.description,
            };
            // Show the tail while typing so the cursor stays visible
            let shown = if focused && display_width(text) >= budget {
                tail_to_width(text, budget.saturating_sub(1))
            } else {
                truncate_to_width(text, budget)
            };
            spans.push(Span::styled(shown, value_style));
            if focused {
                spans.push(Span::styled(
                    CURSOR,
                    Style::default().fg(app.theme.highlight).bg(bg),
                ));
            }
        }
        FormField::Priority => {
            let color = app.theme.priority_color(draft.priority);
            spans.push(Span::styled(
                format!("\u{2039} {} \u{203A}", draft.priority.as_str()),
                Style::default().fg(color).bg(bg),
            ));
        }
        FormField::Category => {
            let name = if draft.category.is_empty() {
                "(none)".to_string()
            } else {
                draft.category.clone()
            };
            spans.push(Span::styled(
                format!("\u{2039} {} \u{203A}", name),
                Style::default().fg(app.theme.cyan).bg(bg),
            ));
            if focused {
                spans.push(Span::styled(
                    "  + new",
                    Style::default().fg(app.theme.dim).bg(bg),
                ));
            }
        }
    }
    if field == FormField::Description
        && let Some(attachment) = &draft.attachment
        && !focused
    {
        spans.push(Span::styled(
            format!("  [{}]", attachment.name),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }
    Line::from(spans)
}

/// The longest suffix of `s` fitting in `max_cells`
fn tail_to_width(s: &str, max_cells: usize) -> String {
    let mut width = 0;
    let mut start = s.len();
    for (idx, c) in s.char_indices().rev() {
        let w = display_width(c.encode_utf8(&mut [0; 4]));
        if width + w > max_cells {
            break;
        }
        width += w;
        start = idx;
    }
    s[start..].to_string()
}

fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::*;
    use super::*;

    #[test]
    fn new_form_shows_fields_and_hints() {
        let (_tmp, mut app) = app_with_tasks(&[]);
        app.open_create_form();
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_form_overlay(frame, &app, area);
        });
        assert!(out.contains("New task"));
        assert!(out.contains("Date"));
        assert!(out.contains("Title"));
        assert!(out.contains("Notes"));
        assert!(out.contains("\u{2039} low \u{203A}"));
        assert!(out.contains("\u{2039} Personal \u{203A}"));
        assert!(out.contains("Enter save"));
    }

    #[test]
    fn edit_form_and_error_line() {
        let (_tmp, mut app) = app_with_tasks(&["Buy milk"]);
        app.open_edit_form();
        app.form.as_mut().unwrap().editor.draft.title.clear();
        app.submit_form();
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_form_overlay(frame, &app, area);
        });
        assert!(out.contains("Edit task"));
        assert!(out.contains("title is required"));
    }

    #[test]
    fn inline_category_input() {
        let (_tmp, mut app) = app_with_tasks(&[]);
        app.open_create_form();
        let form = app.form.as_mut().unwrap();
        form.editor.open_category_input();
        form.editor.category_input = "Gard".into();
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_form_overlay(frame, &app, area);
        });
        assert!(out.contains("New cat."));
        assert!(out.contains("Gard\u{258C}"));
        assert!(out.contains("Enter add"));
    }

    #[test]
    fn tail_keeps_end_of_long_text() {
        assert_eq!(tail_to_width("abcdef", 3), "def");
        assert_eq!(tail_to_width("你好世界", 5), "世界");
        assert_eq!(tail_to_width("ab", 10), "ab");
    }
}
