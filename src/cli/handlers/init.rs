use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::commands::InitArgs;
use crate::io::board_io::{self, BOARD_DIR, BoardError};
use crate::io::config_io;
use crate::io::lock::BoardLock;

const CONFIG_TOML_TEMPLATE: &str = r##"[board]
name = {name}

[categories]
# Seeded into categories.json the first time the board is opened.
# Add more later with: tb category add <name>
defaults = ["Personal", "Work", "Shopping", "Other"]

# --- UI Customization ---
# Uncomment and edit to override defaults.

[ui]
# default_sort = "newest"         # newest, oldest, early, latest
#
# [ui.colors]
# background = "#0C001B"
# text = "#A09BFE"
# text_bright = "#FFFFFF"
# highlight = "#FB4196"
# dim = "#5A5580"
#
# [ui.priority_colors]
# low = "#44FF88"
# medium = "#FFD700"
# high = "#FF4444"
"##;

/// Infer a board name from a directory name: replace hyphens with spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + chars.as_str()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_config_toml(name: &str) -> String {
    // Quote through toml so names with quotes or backslashes stay valid
    let quoted = toml::Value::String(name.to_string()).to_string();
    CONFIG_TOML_TEMPLATE.replace("{name}", &quoted)
}

fn target_root(dir_override: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match dir_override {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            Ok(fs::canonicalize(dir)
                .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?)
        }
        None => Ok(std::env::current_dir()?),
    }
}

/// Create `.taskboard/` with a config and the seeded category list.
/// With `--force` on an existing board only config.toml is rewritten.
pub fn init_board(root: &Path, name: Option<String>, force: bool) -> Result<String, BoardError> {
    let dir = root.join(BOARD_DIR);
    let exists = dir.is_dir();
    if exists && !force {
        return Err(BoardError::AlreadyExists(dir));
    }

    let name = name.unwrap_or_else(|| {
        root.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "To Do List".to_string())
    });

    fs::create_dir_all(&dir).map_err(|e| BoardError::Write {
        path: dir.clone(),
        source: e,
    })?;
    let _lock = BoardLock::acquire_default(&dir)?;
    config_io::write_config_text(&dir, &render_config_toml(&name))?;

    // Opening seeds categories.json from the config defaults
    let board = board_io::open_board(root)?;
    tracing::info!(
        board = %board.dir.display(),
        categories = board.store.categories().len(),
        rewritten = exists,
        "initialized board"
    );
    Ok(name)
}

pub fn cmd_init(
    args: InitArgs,
    dir_override: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = target_root(dir_override)?;

    // Check for an enclosing board and warn
    if let Some(parent) = root.parent()
        && let Ok(parent_root) = board_io::discover_board(parent)
    {
        eprintln!(
            "Note: enclosing board found at {}/",
            parent_root.join(BOARD_DIR).display()
        );
        eprintln!("Creating new board in ./{}/", BOARD_DIR);
    }

    let name = init_board(&root, args.name, args.force)?;
    if args.force {
        println!("Rewrote board config: {}", name);
    } else {
        println!("Initialized board: {}", name);
    }
    Ok(())
}
