use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::board_io::{Board, open_board_from};
use crate::io::lock::BoardLock;
use crate::io::watcher::{BoardWatcher, FileEvent};
use crate::model::task::{Priority, Task, TaskId};
use crate::model::view::ViewParams;
use crate::ops::editor::{CancelOutcome, Submission, TaskEditor};
use crate::ops::pipeline::{ProcessedView, process_tasks};

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing into the live search box
    Search,
    /// Create/edit form overlay is open
    Form,
    /// Waiting for `y` to delete the task under the cursor
    ConfirmDelete,
}

/// Focusable fields of the task form, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Timestamp,
    Title,
    Description,
    Priority,
    Category,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Timestamp,
        FormField::Title,
        FormField::Description,
        FormField::Priority,
        FormField::Category,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Timestamp => "Date",
            FormField::Title => "Title",
            FormField::Description => "Notes",
            FormField::Priority => "Priority",
            FormField::Category => "Category",
        }
    }

    pub fn next(self) -> FormField {
        match self {
            FormField::Timestamp => FormField::Title,
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Priority,
            FormField::Priority => FormField::Category,
            FormField::Category => FormField::Timestamp,
        }
    }

    pub fn prev(self) -> FormField {
        match self {
            FormField::Timestamp => FormField::Category,
            FormField::Title => FormField::Timestamp,
            FormField::Description => FormField::Title,
            FormField::Priority => FormField::Description,
            FormField::Category => FormField::Priority,
        }
    }

    /// Free-text fields take typed characters
    pub fn is_text(self) -> bool {
        matches!(
            self,
            FormField::Timestamp | FormField::Title | FormField::Description
        )
    }
}

/// The open form: editor state plus which field has focus
#[derive(Debug, Clone)]
pub struct FormState {
    pub editor: TaskEditor,
    pub field: FormField,
    /// Last validation error, shown inside the overlay
    pub error: Option<String>,
}

/// Main application state
pub struct App {
    pub board: Board,
    /// Sort, filters and search applied to the list
    pub view: ViewParams,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Cursor index into the processed list
    pub cursor: usize,
    /// First visible row of the list
    pub scroll_offset: usize,
    pub form: Option<FormState>,
    pub pending_delete: Option<TaskId>,
    /// One-shot status message, cleared on the next key press
    pub message: Option<String>,
}

impl App {
    pub fn new(board: Board) -> Self {
        let theme = Theme::from_config(&board.config.ui);
        let view = ViewParams {
            sort: board.config.ui.default_sort,
            ..ViewParams::default()
        };
        App {
            board,
            view,
            mode: Mode::Navigate,
            should_quit: false,
            theme,
            cursor: 0,
            scroll_offset: 0,
            form: None,
            pending_delete: None,
            message: None,
        }
    }

    // -----------------------------------------------------------------------
    // Derived view
    // -----------------------------------------------------------------------

    /// The list as displayed: sorted, filtered, searched (with fallback)
    pub fn visible(&self) -> ProcessedView<'_> {
        process_tasks(self.board.store.tasks(), &self.view)
    }

    pub fn visible_len(&self) -> usize {
        self.visible().len()
    }

    pub fn cursor_task(&self) -> Option<&Task> {
        self.visible().tasks.get(self.cursor).copied()
    }

    fn cursor_id(&self) -> Option<TaskId> {
        self.cursor_task().map(|t| t.id.clone())
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.visible_len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
    }

    /// Put the cursor on `id` if it is visible
    fn focus_task(&mut self, id: &TaskId) {
        if let Some(idx) = self.visible().tasks.iter().position(|t| &t.id == id) {
            self.cursor = idx;
        }
    }

    fn report(&mut self, context: &str, err: impl std::fmt::Display) {
        tracing::error!(error = %err, "{}", context);
        self.message = Some(format!("{}: {}", context, err));
    }

    /// Lock and re-read the board before a mutation. The guard must outlive
    /// the save.
    fn lock_board(&mut self) -> Option<BoardLock> {
        match self.board.lock() {
            Ok(guard) => Some(guard),
            Err(e) => {
                self.report("could not lock board", e);
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Completion and deletion
    // -----------------------------------------------------------------------

    pub fn toggle_current(&mut self) {
        let Some(id) = self.cursor_id() else {
            return;
        };
        let Some(_lock) = self.lock_board() else {
            return;
        };
        if let Err(e) = self.board.store.toggle_completed(&id) {
            self.report("could not save", e);
        }
        self.clamp_cursor();
    }

    pub fn request_delete(&mut self) {
        if let Some(id) = self.cursor_id() {
            self.pending_delete = Some(id);
            self.mode = Mode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        self.mode = Mode::Navigate;
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        let Some(_lock) = self.lock_board() else {
            return;
        };
        match self.board.store.delete_task(&id) {
            Ok(true) => self.message = Some("Task deleted".into()),
            Ok(false) => {}
            Err(e) => self.report("could not delete", e),
        }
        self.clamp_cursor();
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.mode = Mode::Navigate;
    }

    // -----------------------------------------------------------------------
    // View controls
    // -----------------------------------------------------------------------

    pub fn cycle_sort(&mut self) {
        self.view.sort = self.view.sort.next();
        self.clamp_cursor();
    }

    /// All → first category → … → last → All
    pub fn cycle_category(&mut self) {
        let categories = self.board.store.categories();
        let next_idx = match &self.view.category {
            None => Some(0),
            Some(current) => categories.index_of(current).map(|i| i + 1),
        };
        self.view.category = next_idx
            .and_then(|i| categories.get_index(i))
            .map(|c| c.key.clone());
        self.clamp_cursor();
    }

    /// All → low → medium → high → All
    pub fn cycle_priority(&mut self) {
        self.view.priority = match self.view.priority {
            None => Some(Priority::Low),
            Some(Priority::High) => None,
            Some(p) => Some(p.next()),
        };
        self.clamp_cursor();
    }

    pub fn cycle_status(&mut self) {
        self.view.status = self.view.status.next();
        self.clamp_cursor();
    }

    pub fn clear_search(&mut self) {
        self.view.search.clear();
        self.clamp_cursor();
    }

    // -----------------------------------------------------------------------
    // Form
    // -----------------------------------------------------------------------

    pub fn open_create_form(&mut self) {
        let mut editor = TaskEditor::create();
        // Preselect the filtered category, else the first one
        editor.draft.category = self
            .view
            .category
            .clone()
            .or_else(|| {
                self.board
                    .store
                    .categories()
                    .get_index(0)
                    .map(|c| c.key.clone())
            })
            .unwrap_or_default();
        self.form = Some(FormState {
            editor,
            field: FormField::Title,
            error: None,
        });
        self.mode = Mode::Form;
    }

    pub fn open_edit_form(&mut self) {
        let Some(task) = self.cursor_task() else {
            return;
        };
        let editor = TaskEditor::edit(task);
        self.form = Some(FormState {
            editor,
            field: FormField::Title,
            error: None,
        });
        self.mode = Mode::Form;
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.mode = Mode::Navigate;
    }

    pub fn submit_form(&mut self) {
        if self.form.is_none() {
            return;
        }
        let Some(_lock) = self.lock_board() else {
            return;
        };
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let submission = match form.editor.submit(self.board.store.categories()) {
            Ok(s) => s,
            Err(e) => {
                form.error = Some(e.to_string());
                return;
            }
        };
        let created = matches!(submission, Submission::Create(_));
        match self.board.store.apply(submission) {
            Ok(id) => {
                self.close_form();
                self.message = Some(if created { "Task added" } else { "Task updated" }.into());
                self.focus_task(&id);
            }
            Err(e) => {
                tracing::error!(error = %e, "could not save task");
                if let Some(form) = self.form.as_mut() {
                    form.error = Some(e.to_string());
                }
            }
        }
    }

    /// The form's cancel action: resets a new-task form, closes an edit form
    pub fn cancel_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        form.error = None;
        if form.editor.cancel() == CancelOutcome::Close {
            self.close_form();
        }
    }

    /// Store the inline category input and select it in the form
    pub fn add_form_category(&mut self) {
        if self.form.is_none() {
            return;
        }
        let Some(_lock) = self.lock_board() else {
            return;
        };
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let store = &mut self.board.store;
        match form.editor.add_category(|name| store.add_category(name)) {
            Ok(category) => {
                form.error = None;
                self.message = Some(format!("Category added: {}", category.label));
            }
            Err(e) => form.error = Some(e.to_string()),
        }
    }

    /// Step the form's category through the registry
    pub fn cycle_form_category(&mut self, forward: bool) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let categories = self.board.store.categories();
        let len = categories.len();
        if len == 0 {
            return;
        }
        let idx = match categories.index_of(&form.editor.draft.category) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        if let Some(category) = categories.get_index(idx) {
            form.editor.draft.category = category.key.clone();
        }
    }

    // -----------------------------------------------------------------------
    // Outside changes
    // -----------------------------------------------------------------------

    /// Re-read the board after files changed on disk
    pub fn reload_from_disk(&mut self) {
        match self.board.reload() {
            Ok(()) => {
                self.theme = Theme::from_config(&self.board.config.ui);
                tracing::debug!("reloaded board after outside change");
            }
            Err(e) => self.report("reload failed", e),
        }
        self.clamp_cursor();
    }
}

/// Restore UI state from .state.json
pub fn restore_ui_state(app: &mut App) {
    use crate::io::state::read_ui_state;

    let Some(ui_state) = read_ui_state(&app.board.dir) else {
        return;
    };
    app.view = ui_state.view;
    // A category that no longer exists would hide everything
    if let Some(category) = &app.view.category
        && !app.board.store.categories().contains(category)
    {
        app.view.category = None;
    }
    app.cursor = ui_state.cursor;
    app.clamp_cursor();
}

/// Save UI state to .state.json
pub fn save_ui_state(app: &App) {
    use crate::io::state::{UiState, write_ui_state};

    let ui_state = UiState {
        view: app.view.clone(),
        cursor: app.cursor,
    };
    if let Err(e) = write_ui_state(&app.board.dir, &ui_state) {
        tracing::warn!(error = %e, "could not save UI state");
    }
}

/// Run the TUI application
pub fn run(board_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    // Discover and load board
    let start = match board_dir {
        Some(dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir()?,
    };
    let board = open_board_from(&start)?;

    if let Err(e) = crate::logging::init_file(&board.dir) {
        eprintln!("warning: could not open log file: {}", e);
    }
    tracing::info!(board = %board.dir.display(), "starting TUI");

    let watcher = match BoardWatcher::start(&board.dir) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "file watcher unavailable, outside changes won't reload");
            None
        }
    };

    let mut app = App::new(board);

    // Restore saved UI state
    restore_ui_state(&mut app);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    // Save UI state before exit
    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&BoardWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
            // Debounced state save: every ~5 key presses
            save_counter += 1;
            if save_counter >= 5 {
                save_ui_state(app);
                save_counter = 0;
            }
        }

        if let Some(watcher) = watcher {
            let changed: Vec<PathBuf> = watcher
                .poll()
                .into_iter()
                .flat_map(|FileEvent::Changed(paths)| paths)
                .collect();
            if !changed.is_empty() {
                tracing::debug!(files = changed.len(), "board files changed");
                app.reload_from_disk();
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::board_io::open_board;
    use crate::model::view::{SortKey, StatusFilter};
    use crate::tui::render::test_helpers::app_with_tasks;

    #[test]
    fn form_field_cycle() {
        let mut f = FormField::Timestamp;
        for expected in FormField::ALL {
            assert_eq!(f, expected);
            f = f.next();
        }
        assert_eq!(f.prev(), FormField::Category);
        assert!(FormField::Title.is_text());
        assert!(!FormField::Priority.is_text());
    }

    #[test]
    fn cursor_clamps_to_visible_list() {
        let (_tmp, mut app) = app_with_tasks(&["One", "Two", "Three"]);
        app.move_cursor(10);
        assert_eq!(app.cursor, 2);
        app.move_cursor(-5);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn toggle_marks_task_done_and_persists() {
        let (_tmp, mut app) = app_with_tasks(&["One"]);
        app.toggle_current();
        assert!(app.board.store.tasks()[0].completed);
        app.board.reload().unwrap();
        assert!(app.board.store.tasks()[0].completed);
    }

    #[test]
    fn delete_needs_confirmation() {
        let (_tmp, mut app) = app_with_tasks(&["One", "Two"]);
        app.request_delete();
        assert_eq!(app.mode, Mode::ConfirmDelete);
        app.cancel_delete();
        assert_eq!(app.board.store.tasks().len(), 2);

        app.request_delete();
        app.confirm_delete();
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.board.store.tasks().len(), 1);
    }

    #[test]
    fn category_cycle_wraps_through_all() {
        let (_tmp, mut app) = app_with_tasks(&[]);
        let keys: Vec<String> = app
            .board
            .store
            .categories()
            .keys()
            .map(String::from)
            .collect();
        for key in &keys {
            app.cycle_category();
            assert_eq!(app.view.category.as_ref(), Some(key));
        }
        app.cycle_category();
        assert_eq!(app.view.category, None);
    }

    #[test]
    fn priority_and_status_cycles() {
        let (_tmp, mut app) = app_with_tasks(&[]);
        app.cycle_priority();
        assert_eq!(app.view.priority, Some(Priority::Low));
        app.cycle_priority();
        app.cycle_priority();
        assert_eq!(app.view.priority, Some(Priority::High));
        app.cycle_priority();
        assert_eq!(app.view.priority, None);

        app.cycle_status();
        assert_eq!(app.view.status, StatusFilter::Active);
        app.cycle_sort();
        assert_eq!(app.view.sort, SortKey::Oldest);
    }

    #[test]
    fn create_form_submits_and_focuses_new_task() {
        let (_tmp, mut app) = app_with_tasks(&["Existing"]);
        app.open_create_form();
        assert_eq!(app.mode, Mode::Form);
        let form = app.form.as_mut().unwrap();
        assert_eq!(form.editor.draft.category, "Personal");
        form.editor.draft.title = "Buy milk".into();
        app.submit_form();

        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.board.store.tasks().len(), 2);
        assert_eq!(app.cursor_task().unwrap().title, "Buy milk");
    }

    #[test]
    fn invalid_form_stays_open_with_error() {
        let (_tmp, mut app) = app_with_tasks(&[]);
        app.open_create_form();
        app.submit_form();
        assert_eq!(app.mode, Mode::Form);
        assert_eq!(
            app.form.as_ref().unwrap().error.as_deref(),
            Some("title is required")
        );
        assert!(app.board.store.tasks().is_empty());
    }

    #[test]
    fn cancel_resets_create_and_closes_edit() {
        let (_tmp, mut app) = app_with_tasks(&["One"]);
        app.open_create_form();
        app.form.as_mut().unwrap().editor.draft.title = "half typed".into();
        app.cancel_form();
        assert_eq!(app.mode, Mode::Form);
        assert!(app.form.as_ref().unwrap().editor.draft.title.is_empty());
        app.close_form();

        app.open_edit_form();
        app.form.as_mut().unwrap().editor.draft.title = "changed".into();
        app.cancel_form();
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.board.store.tasks()[0].title, "One");
    }

    #[test]
    fn inline_category_add_selects_it() {
        let (_tmp, mut app) = app_with_tasks(&[]);
        app.open_create_form();
        let form = app.form.as_mut().unwrap();
        form.editor.open_category_input();
        form.editor.category_input = "Garden".into();
        app.add_form_category();

        let form = app.form.as_ref().unwrap();
        assert_eq!(form.editor.draft.category, "Garden");
        assert!(!form.editor.adding_category);
        assert_eq!(app.message.as_deref(), Some("Category added: Garden"));
        assert!(app.board.store.categories().contains("Garden"));

        app.form.as_mut().unwrap().editor.category_input = "Garden".into();
        app.add_form_category();
        assert!(app.form.as_ref().unwrap().error.is_some());
    }

    #[test]
    fn form_category_cycles_both_ways() {
        let (_tmp, mut app) = app_with_tasks(&[]);
        app.open_create_form();
        app.cycle_form_category(true);
        assert_eq!(app.form.as_ref().unwrap().editor.draft.category, "Work");
        app.cycle_form_category(false);
        app.cycle_form_category(false);
        assert_eq!(app.form.as_ref().unwrap().editor.draft.category, "Other");
    }

    #[test]
    fn ui_state_round_trips_through_board_dir() {
        let (_tmp, mut app) = app_with_tasks(&["One", "Two"]);
        app.view.search = "tw".into();
        app.view.category = Some("Work".into());
        app.cursor = 1;
        save_ui_state(&app);

        app.view = ViewParams::default();
        restore_ui_state(&mut app);
        assert_eq!(app.view.search, "tw");
        assert_eq!(app.view.category.as_deref(), Some("Work"));
        // Clamped to the visible list
        assert!(app.cursor < app.visible_len());
    }

    #[test]
    fn mutations_keep_tasks_written_by_another_process() {
        let (tmp, mut app) = app_with_tasks(&["Buy milk"]);
        let mut other = open_board(tmp.path()).unwrap();
        let at = other.store.tasks()[0].timestamp;
        other
            .store
            .create_task(Task::new("Added elsewhere", "Work", at))
            .unwrap();

        // The app has not reloaded yet; its toggle must not clobber the file
        assert_eq!(app.board.store.tasks().len(), 1);
        app.toggle_current();

        let on_disk = open_board(tmp.path()).unwrap();
        let titles: Vec<&str> = on_disk.store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Buy milk", "Added elsewhere"]);
        assert!(on_disk.store.tasks()[0].completed);
    }
}
