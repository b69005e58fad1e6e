use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, FormField, FormState};
use crate::util::unicode::pop_grapheme;

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    let Some(form) = app.form.as_mut() else {
        return;
    };

    // Inline "new category" input captures everything until Enter/Esc
    if form.editor.adding_category {
        match key.code {
            KeyCode::Enter => app.add_form_category(),
            KeyCode::Esc => {
                form.editor.close_category_input();
                form.error = None;
            }
            KeyCode::Backspace => pop_grapheme(&mut form.editor.category_input),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                form.editor.category_input.push(c)
            }
            _ => {}
        }
        return;
    }

    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => app.close_form(),
        (_, KeyCode::Enter) => app.submit_form(),
        (KeyModifiers::CONTROL, KeyCode::Char('r')) => app.cancel_form(),
        (_, KeyCode::Tab) | (_, KeyCode::Down) => form.field = form.field.next(),
        (_, KeyCode::BackTab) | (_, KeyCode::Up) => form.field = form.field.prev(),

        (_, KeyCode::Left) | (_, KeyCode::Right) => {
            let forward = key.code == KeyCode::Right;
            match form.field {
                FormField::Priority => {
                    let p = form.editor.draft.priority;
                    form.editor.draft.priority = if forward { p.next() } else { p.prev() };
                }
                FormField::Category => app.cycle_form_category(forward),
                _ => {}
            }
        }

        (_, KeyCode::Char('+')) if form.field == FormField::Category => {
            form.editor.open_category_input();
        }

        (_, KeyCode::Backspace) => {
            if let Some(text) = text_field(form) {
                pop_grapheme(text);
            }
        }
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            if let Some(text) = text_field(form) {
                text.push(c);
            }
        }
        _ => {}
    }
}

/// The buffer behind the focused field, if it takes free text
fn text_field(form: &mut FormState) -> Option<&mut String> {
    match form.field {
        FormField::Timestamp => Some(&mut form.editor.draft.timestamp),
        FormField::Title => Some(&mut form.editor.draft.title),
        FormField::Description => Some(&mut form.editor.draft.description),
        FormField::Priority | FormField::Category => None,
    }
}
