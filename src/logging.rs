use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Environment variable holding `EnvFilter` directives
pub const LOG_ENV: &str = "TASKBOARD_LOG";
/// Log file inside the board directory while the TUI owns the terminal
pub const TUI_LOG_FILE: &str = "taskboard.log";

const DEFAULT_DIRECTIVES: &str = "warn";

/// `TASKBOARD_LOG` > `RUST_LOG` > warn. Unparseable values fall through.
fn build_env_filter() -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV)
        && let Ok(filter) = EnvFilter::try_new(&directives)
    {
        return filter;
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Compact stderr logging for CLI subcommands.
pub fn init_stderr() {
    let use_ansi = std::io::IsTerminal::is_terminal(&std::io::stderr());
    let _ = tracing_subscriber::registry()
        .with(build_env_filter())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(use_ansi)
                .without_time()
                .compact(),
        )
        .try_init();
}

/// Append logs to `<board_dir>/taskboard.log`. Stderr would tear the
/// alternate screen, so the TUI logs to a file or not at all.
pub fn init_file(board_dir: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(board_dir.join(TUI_LOG_FILE))?;
    let _ = tracing_subscriber::registry()
        .with(build_env_filter())
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init();
    Ok(())
}
