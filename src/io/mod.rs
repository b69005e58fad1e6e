pub mod board_io;
pub mod config_io;
pub mod lock;
pub mod recovery;
pub mod state;
pub mod storage;
pub mod task_store;
pub mod watcher;
