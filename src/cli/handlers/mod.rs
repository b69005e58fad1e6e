mod init;
pub use init::{cmd_init, init_board};

use std::path::PathBuf;
use std::sync::Mutex;

/// Global override for the board directory (set by -C flag)
static BOARD_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::board_io::{self, Board, BoardError};
use crate::model::task::{Attachment, Task};
use crate::model::view::ViewParams;
use crate::ops::editor::TaskEditor;
use crate::ops::pipeline::process_tasks;
use crate::ops::task_ops::{self, TaskError};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run one subcommand. The TUI (no subcommand) is launched from main.
pub fn dispatch(command: Commands, json: bool, board_dir: Option<&str>) -> CmdResult {
    // Remember -C for load_board_cwd(); init resolves it itself
    if let Some(dir) = board_dir
        && let Ok(mut slot) = BOARD_DIR_OVERRIDE.lock()
    {
        slot.replace(PathBuf::from(dir));
    }

    match command {
        Commands::Init(args) => cmd_init(args, board_dir),

        // Read commands
        Commands::List(args) => cmd_list(args, json),
        Commands::Show(args) => cmd_show(args, json),
        Commands::Stats => cmd_stats(json),

        // Write commands
        Commands::Add(args) => cmd_add(args, json),
        Commands::Edit(args) => cmd_edit(args, json),
        Commands::Delete(args) => cmd_delete(args),
        Commands::Done(args) => cmd_set_done(args, true),
        Commands::Reopen(args) => cmd_set_done(args, false),

        // Categories
        Commands::Category(args) => cmd_category(args, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_board_cwd() -> Result<Board, Box<dyn std::error::Error>> {
    let override_dir = BOARD_DIR_OVERRIDE
        .lock()
        .ok()
        .and_then(|slot| slot.as_ref().cloned());
    let start = match override_dir {
        Some(dir) => std::fs::canonicalize(&dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir.display(), e))?,
        None => std::env::current_dir().map_err(|e| BoardError::Read {
            path: PathBuf::from("."),
            source: e,
        })?,
    };
    Ok(board_io::open_board_from(&start)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_task(task: &Task, json: bool) -> CmdResult {
    if json {
        print_json(&task_to_json(task))
    } else {
        for line in format_task_detail(task) {
            println!("{}", line);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

/// Build view parameters from `list` flags; the sort falls back to config.
fn list_params(args: ListArgs, board: &Board) -> ViewParams {
    ViewParams {
        sort: args.sort.unwrap_or(board.config.ui.default_sort),
        category: args.category,
        priority: args.priority,
        status: args.status,
        search: args.search.unwrap_or_default(),
    }
}

fn cmd_list(args: ListArgs, json: bool) -> CmdResult {
    let board = load_board_cwd()?;
    let params = list_params(args, &board);
    let view = process_tasks(board.store.tasks(), &params);

    if json {
        return print_json(&TaskListJson {
            count: view.len(),
            fell_back: view.fell_back,
            tasks: view.tasks.iter().map(|t| task_to_json(t)).collect(),
        });
    }

    if view.is_empty() {
        println!("No tasks yet. Add one with: tb add <title> --category <name>");
        return Ok(());
    }
    if view.fell_back {
        eprintln!("No tasks match; showing all tasks.");
    }
    for task in &view.tasks {
        println!("{}", format_task_line(task));
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, json: bool) -> CmdResult {
    let board = load_board_cwd()?;
    let id = board.store.resolve(&args.id)?;
    let task = board
        .store
        .get(&id)
        .ok_or_else(|| TaskError::NotFound(args.id.clone()))?;
    print_task(task, json)
}

fn cmd_stats(json: bool) -> CmdResult {
    let board = load_board_cwd()?;
    let stats = task_ops::task_stats(board.store.tasks());
    if json {
        return print_json(&stats_to_json(&stats));
    }
    for line in format_stats(&stats) {
        println!("{}", line);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, json: bool) -> CmdResult {
    let mut board = load_board_cwd()?;
    let _lock = board.lock()?;

    let mut editor = TaskEditor::create();
    editor.draft.title = args.title;
    editor.draft.category = args.category;
    editor.draft.description = args.description.unwrap_or_default();
    editor.draft.priority = args.priority;
    if let Some(at) = args.at {
        editor.draft.timestamp = at;
    }
    if let Some(path) = args.attach {
        let attachment = Attachment::read(&path)
            .map_err(|e| format!("cannot read attachment {}: {}", path.display(), e))?;
        editor.draft.attachment = Some(attachment);
    }

    let submission = editor.submit(board.store.categories())?;
    let id = board.store.apply(submission)?;
    let task = board
        .store
        .get(&id)
        .ok_or_else(|| TaskError::NotFound(id.to_string()))?;

    if json {
        print_json(&task_to_json(task))
    } else {
        println!("Added {}: {}", id.short(), task.title);
        Ok(())
    }
}

fn cmd_edit(args: EditArgs, json: bool) -> CmdResult {
    let mut board = load_board_cwd()?;
    let _lock = board.lock()?;
    let id = board.store.resolve(&args.id)?;
    let original = board
        .store
        .get(&id)
        .ok_or_else(|| TaskError::NotFound(args.id.clone()))?;

    let mut editor = TaskEditor::edit(original);
    if let Some(title) = args.title {
        editor.draft.title = title;
    }
    if let Some(description) = args.description {
        editor.draft.description = description;
    }
    if let Some(priority) = args.priority {
        editor.draft.priority = priority;
    }
    if let Some(category) = args.category {
        editor.draft.category = category;
    }
    if let Some(at) = args.at {
        editor.draft.timestamp = at;
    }

    let submission = editor.submit(board.store.categories())?;
    board.store.apply(submission)?;
    let task = board
        .store
        .get(&id)
        .ok_or_else(|| TaskError::NotFound(id.to_string()))?;

    if json {
        print_json(&task_to_json(task))
    } else {
        println!("Updated {}: {}", id.short(), task.title);
        Ok(())
    }
}

fn cmd_delete(args: DeleteArgs) -> CmdResult {
    let mut board = load_board_cwd()?;
    let _lock = board.lock()?;
    let id = match board.store.resolve(&args.id) {
        Ok(id) => id,
        Err(TaskError::NotFound(_)) => {
            println!("No task matches '{}'; nothing deleted", args.id);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let title = board.store.get(&id).map(|t| t.title.clone());
    if board.store.delete_task(&id)? {
        println!("Deleted {}: {}", id.short(), title.unwrap_or_default());
    }
    Ok(())
}

fn cmd_set_done(args: IdArgs, done: bool) -> CmdResult {
    let mut board = load_board_cwd()?;
    let _lock = board.lock()?;
    let id = board.store.resolve(&args.id)?;
    board.store.set_completed(&id, done)?;
    let verb = if done { "Done" } else { "Reopened" };
    let title = board.store.get(&id).map(|t| t.title.as_str()).unwrap_or("");
    println!("{} {}: {}", verb, id.short(), title);
    Ok(())
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

fn cmd_category(args: CategoryCmd, json: bool) -> CmdResult {
    let mut board = load_board_cwd()?;
    match args.action {
        None => {
            let categories: Vec<_> = board.store.categories().iter().collect();
            if json {
                let labels: Vec<&str> = categories.iter().map(|c| c.label.as_str()).collect();
                return print_json(&labels);
            }
            for line in format_categories(&categories) {
                println!("{}", line);
            }
            Ok(())
        }
        Some(CategoryAction::Add { name }) => {
            let _lock = board.lock()?;
            let category = board.store.add_category(&name)?;
            println!("Category added: {}", category.label);
            Ok(())
        }
    }
}
