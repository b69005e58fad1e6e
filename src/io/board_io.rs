use std::path::{Path, PathBuf};

use crate::model::config::BoardConfig;

use super::config_io::read_config;
use super::lock::{BoardLock, LockError};
use super::storage::DirStorage;
use super::task_store::{StoreError, TaskStore};

/// Name of the board directory inside a board root
pub const BOARD_DIR: &str = ".taskboard";

/// Error type for board I/O operations
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("not a taskboard: no .taskboard/ directory found (run `tb init`)")]
    NotABoard,
    #[error("a board already exists at {0} (use --force to rewrite its config)")]
    AlreadyExists(PathBuf),
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("could not serialize config.toml: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// A loaded board: its location, config and task store
pub struct Board {
    /// Directory containing `.taskboard/`
    pub root: PathBuf,
    /// The `.taskboard/` directory itself
    pub dir: PathBuf,
    pub config: BoardConfig,
    pub store: TaskStore<DirStorage>,
}

impl Board {
    /// Re-read config and both collections from disk
    pub fn reload(&mut self) -> Result<(), BoardError> {
        self.config = read_config(&self.dir)?;
        self.store.reload(&self.config.categories.defaults)?;
        Ok(())
    }

    /// Take the board lock and re-read everything under it.
    ///
    /// Mutations made while the returned guard is alive start from what is
    /// on disk now, so a concurrent writer's changes are never overwritten.
    pub fn lock(&mut self) -> Result<BoardLock, BoardError> {
        let guard = BoardLock::acquire_default(&self.dir)?;
        self.reload()?;
        Ok(guard)
    }
}

/// Find the board by walking up from `start`, looking for `.taskboard/`.
/// Returns the root directory (the parent of `.taskboard/`).
pub fn discover_board(start: &Path) -> Result<PathBuf, BoardError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(BOARD_DIR).is_dir() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(BoardError::NotABoard);
        }
    }
}

/// Load the board rooted at `root`.
pub fn open_board(root: &Path) -> Result<Board, BoardError> {
    let dir = root.join(BOARD_DIR);
    if !dir.is_dir() {
        return Err(BoardError::NotABoard);
    }
    let config = read_config(&dir)?;
    let store = TaskStore::load(DirStorage::new(&dir), &config.categories.defaults)?;
    Ok(Board {
        root: root.to_path_buf(),
        dir,
        config,
        store,
    })
}

/// Discover from `start` and load
pub fn open_board_from(start: &Path) -> Result<Board, BoardError> {
    let root = discover_board(start)?;
    open_board(&root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Task;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_board(root: &Path) {
        let dir = root.join(BOARD_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("config.toml"),
            "[board]\nname = \"test\"\n\n[categories]\ndefaults = [\"Home\", \"Work\"]\n",
        )
        .unwrap();
        fs::write(
            dir.join("tasks.json"),
            r#"[{
                "taskId": "t-1",
                "dateAndTime": "2025-08-09T17:30:32.352+08:00",
                "title": "Water plants",
                "priority": "low",
                "category": "Home",
                "status": false
            }]"#,
        )
        .unwrap();
    }

    #[test]
    fn discover_from_subdirectory() {
        let tmp = TempDir::new().unwrap();
        create_test_board(tmp.path());
        let sub = tmp.path().join("a/b");
        fs::create_dir_all(&sub).unwrap();

        assert_eq!(discover_board(tmp.path()).unwrap(), tmp.path());
        assert_eq!(discover_board(&sub).unwrap(), tmp.path());
    }

    #[test]
    fn discover_not_found() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            discover_board(tmp.path()),
            Err(BoardError::NotABoard)
        ));
    }

    #[test]
    fn open_loads_config_and_seeds_categories() {
        let tmp = TempDir::new().unwrap();
        create_test_board(tmp.path());

        let board = open_board(tmp.path()).unwrap();
        assert_eq!(board.config.board.name, "test");
        assert_eq!(board.store.tasks().len(), 1);
        assert_eq!(board.store.tasks()[0].title, "Water plants");
        assert_eq!(
            board.store.categories().keys().collect::<Vec<_>>(),
            vec!["Home", "Work"]
        );
        assert!(board.dir.join("categories.json").exists());
    }

    #[test]
    fn reload_picks_up_outside_writes() {
        let tmp = TempDir::new().unwrap();
        create_test_board(tmp.path());
        let mut board = open_board(tmp.path()).unwrap();

        fs::write(board.dir.join("tasks.json"), "[]").unwrap();
        board.reload().unwrap();
        assert!(board.store.tasks().is_empty());
    }

    #[test]
    fn locked_write_keeps_concurrent_additions() {
        let tmp = TempDir::new().unwrap();
        create_test_board(tmp.path());
        let mut first = open_board(tmp.path()).unwrap();
        let mut second = open_board(tmp.path()).unwrap();
        let at = first.store.tasks()[0].timestamp;

        {
            let _lock = first.lock().unwrap();
            first.store.create_task(Task::new("From first", "Home", at)).unwrap();
        }
        // `second` loaded before that write; locking brings it up to date
        {
            let _lock = second.lock().unwrap();
            second.store.create_task(Task::new("From second", "Home", at)).unwrap();
        }

        let reopened = open_board(tmp.path()).unwrap();
        let titles: Vec<&str> = reopened.store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Water plants", "From first", "From second"]);
    }

    #[cfg(unix)]
    #[test]
    fn lock_is_exclusive_while_held() {
        let tmp = TempDir::new().unwrap();
        create_test_board(tmp.path());
        let mut board = open_board(tmp.path()).unwrap();

        let _held = board.lock().unwrap();
        let other = BoardLock::acquire(&board.dir, std::time::Duration::from_millis(50));
        assert!(matches!(other, Err(LockError::Timeout { .. })));
    }
}
