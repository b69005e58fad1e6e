use chrono::Duration;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::cli::handlers::init_board;
use crate::io::board_io::open_board;
use crate::model::task::Task;
use crate::model::timestamp::parse_timestamp;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// A fresh on-disk board named "Test Board" with one "Work" task per
/// title, stamped an hour apart in order. Keep the TempDir alive.
pub fn app_with_tasks(titles: &[&str]) -> (TempDir, App) {
    let tmp = TempDir::new().unwrap();
    init_board(tmp.path(), Some("Test Board".into()), false).unwrap();
    let mut board = open_board(tmp.path()).unwrap();

    let start = parse_timestamp("2025-08-09T09:00:00.000+00:00").unwrap();
    for (i, title) in titles.iter().enumerate() {
        let task = Task::new(*title, "Work", start + Duration::hours(i as i64));
        board.store.create_task(task).unwrap();
    }
    (tmp, App::new(board))
}
