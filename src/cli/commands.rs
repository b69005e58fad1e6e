use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::task::Priority;
use crate::model::view::{SortKey, StatusFilter};

#[derive(Parser)]
#[command(name = "tb", about = concat!("[x] taskboard v", env!("CARGO_PKG_VERSION"), " - sort, filter and search your tasks"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different board directory
    #[arg(short = 'C', long = "board-dir", global = true)]
    pub board_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new board in the current directory
    Init(InitArgs),
    /// List tasks (sorted, filtered and searched)
    List(ListArgs),
    /// Show task details
    Show(ShowArgs),
    /// Add a task
    Add(AddArgs),
    /// Edit a task's fields
    Edit(EditArgs),
    /// Permanently delete a task
    Delete(DeleteArgs),
    /// Mark a task done
    Done(IdArgs),
    /// Mark a done task as not done
    Reopen(IdArgs),
    /// List categories, or add one
    Category(CategoryCmd),
    /// Show task statistics
    Stats,
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Board name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Rewrite config.toml even if .taskboard/ already exists
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Sort: newest, oldest, early, latest (default from config)
    #[arg(long)]
    pub sort: Option<SortKey>,
    /// Only tasks in this category
    #[arg(long)]
    pub category: Option<String>,
    /// Only tasks with this priority (low, medium, high)
    #[arg(long)]
    pub priority: Option<Priority>,
    /// Only tasks with this status (all, active, done)
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,
    /// Case-insensitive title search
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task ID (or unique prefix)
    pub id: String,
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Category (must already exist)
    #[arg(long, short = 'c')]
    pub category: String,
    /// Free-text description
    #[arg(long, short = 'd')]
    pub description: Option<String>,
    /// Priority: low, medium, high
    #[arg(long, short = 'p', default_value = "low")]
    pub priority: Priority,
    /// Date-time, e.g. 2025-08-09T17:30:00+08:00 (default: now)
    #[arg(long)]
    pub at: Option<String>,
    /// Attach a file for this session
    #[arg(long)]
    pub attach: Option<PathBuf>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID (or unique prefix)
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description (empty string clears it)
    #[arg(long, short = 'd')]
    pub description: Option<String>,
    /// New priority
    #[arg(long, short = 'p')]
    pub priority: Option<Priority>,
    /// New category (must already exist)
    #[arg(long, short = 'c')]
    pub category: Option<String>,
    /// New date-time
    #[arg(long)]
    pub at: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Task ID (or unique prefix)
    pub id: String,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task ID (or unique prefix)
    pub id: String,
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct CategoryCmd {
    #[command(subcommand)]
    pub action: Option<CategoryAction>,
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Add a category
    Add {
        /// Category name
        name: String,
    },
}
