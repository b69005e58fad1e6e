use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('q')) => app.should_quit = true,
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => app.should_quit = true,

        // Cursor movement
        (_, KeyCode::Char('j')) | (_, KeyCode::Down) => app.move_cursor(1),
        (_, KeyCode::Char('k')) | (_, KeyCode::Up) => app.move_cursor(-1),
        (_, KeyCode::Char('g')) | (_, KeyCode::Home) => app.cursor = 0,
        (_, KeyCode::Char('G')) | (_, KeyCode::End) => {
            app.cursor = app.visible_len().saturating_sub(1);
        }

        // Task actions
        (_, KeyCode::Char(' ')) | (_, KeyCode::Enter) => app.toggle_current(),
        (KeyModifiers::NONE, KeyCode::Char('a')) => app.open_create_form(),
        (KeyModifiers::NONE, KeyCode::Char('e')) => app.open_edit_form(),
        (KeyModifiers::NONE, KeyCode::Char('d')) => app.request_delete(),

        // View controls
        (KeyModifiers::NONE, KeyCode::Char('s')) => app.cycle_sort(),
        (KeyModifiers::NONE, KeyCode::Char('c')) => app.cycle_category(),
        (KeyModifiers::NONE, KeyCode::Char('p')) => app.cycle_priority(),
        (KeyModifiers::NONE, KeyCode::Char('f')) => app.cycle_status(),
        (_, KeyCode::Char('/')) => app.mode = Mode::Search,
        (_, KeyCode::Esc) => app.clear_search(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::super::handle_key;
    use super::super::test_keys::*;
    use crate::model::view::SortKey;
    use crate::tui::app::Mode;
    use crate::tui::render::test_helpers::app_with_tasks;
    use crossterm::event::KeyCode;

    #[test]
    fn jk_move_and_space_toggles() {
        let (_tmp, mut app) = app_with_tasks(&["One", "Two"]);
        handle_key(&mut app, ch('j'));
        assert_eq!(app.cursor, 1);
        let title = app.cursor_task().unwrap().title.clone();
        handle_key(&mut app, ch(' '));
        let task = app
            .board
            .store
            .tasks()
            .iter()
            .find(|t| t.title == title)
            .unwrap();
        assert!(task.completed);
        handle_key(&mut app, key(KeyCode::Up));
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn d_then_y_deletes() {
        let (_tmp, mut app) = app_with_tasks(&["One"]);
        handle_key(&mut app, ch('d'));
        assert_eq!(app.mode, Mode::ConfirmDelete);
        handle_key(&mut app, ch('y'));
        assert!(app.board.store.tasks().is_empty());
    }

    #[test]
    fn view_keys_cycle() {
        let (_tmp, mut app) = app_with_tasks(&[]);
        handle_key(&mut app, ch('s'));
        assert_eq!(app.view.sort, SortKey::Oldest);
        handle_key(&mut app, ch('c'));
        assert_eq!(app.view.category.as_deref(), Some("Personal"));
        handle_key(&mut app, ch('p'));
        assert!(app.view.priority.is_some());
        handle_key(&mut app, ch('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn a_and_e_open_the_form() {
        let (_tmp, mut app) = app_with_tasks(&["One"]);
        handle_key(&mut app, ch('a'));
        assert_eq!(app.mode, Mode::Form);
        assert!(!app.form.as_ref().unwrap().editor.is_editing());
        handle_key(&mut app, key(KeyCode::Esc));

        handle_key(&mut app, ch('e'));
        assert!(app.form.as_ref().unwrap().editor.is_editing());
    }
}
