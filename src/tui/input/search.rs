use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};
use crate::util::unicode::pop_grapheme;

/// Live search: every keystroke re-runs the pipeline through `app.view.search`.
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Clear and leave
        (_, KeyCode::Esc) => {
            app.clear_search();
            app.mode = Mode::Navigate;
        }
        // Keep the term and go back to the list
        (_, KeyCode::Enter) | (_, KeyCode::Down) => {
            app.mode = Mode::Navigate;
        }
        (_, KeyCode::Backspace) => {
            pop_grapheme(&mut app.view.search);
            app.cursor = 0;
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            app.view.search.clear();
            app.cursor = 0;
        }
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            app.view.search.push(c);
            app.cursor = 0;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::super::handle_key;
    use super::super::test_keys::*;
    use crate::tui::app::Mode;
    use crate::tui::render::test_helpers::app_with_tasks;
    use crossterm::event::KeyCode;

    #[test]
    fn typing_filters_live() {
        let (_tmp, mut app) = app_with_tasks(&["Buy milk", "Write report"]);
        handle_key(&mut app, ch('/'));
        assert_eq!(app.mode, Mode::Search);
        type_str(&mut app, "MILK");
        assert_eq!(app.view.search, "MILK");
        let view = app.visible();
        assert_eq!(view.len(), 1);
        assert_eq!(view.tasks[0].title, "Buy milk");
    }

    #[test]
    fn enter_keeps_esc_clears() {
        let (_tmp, mut app) = app_with_tasks(&["Buy milk"]);
        handle_key(&mut app, ch('/'));
        type_str(&mut app, "mil");
        handle_key(&mut app, key(KeyCode::Backspace));
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.view.search, "mi");

        handle_key(&mut app, key(KeyCode::Esc));
        assert!(app.view.search.is_empty());
    }

    #[test]
    fn no_match_falls_back_to_everything() {
        let (_tmp, mut app) = app_with_tasks(&["Buy milk", "Write report"]);
        handle_key(&mut app, ch('/'));
        type_str(&mut app, "zzz");
        let view = app.visible();
        assert!(view.fell_back);
        assert_eq!(view.len(), 2);
    }
}
