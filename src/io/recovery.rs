use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// Header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- taskboard recovery log: append-only copies of data that could not be saved.
     Each entry holds the full blob that failed to write.
     Safe to delete once you have what you need. -->

---
";

/// A blob that could not be written to storage.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    /// Storage key of the lost write (`tasks`, `categories`)
    pub key: String,
    pub error: String,
    pub body: String,
}

pub fn recovery_log_path(board_dir: &Path) -> PathBuf {
    board_dir.join("recovery.log")
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl RecoveryEntry {
    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} write failed: {}\n\nError: {}\n\n```json\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.key,
            self.error,
        );
        out.push_str(&self.body);
        if !self.body.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("```\n\n---\n");
        out
    }
}

/// Append an entry to the recovery log. Failures here are only logged.
pub fn log_recovery(board_dir: &Path, entry: RecoveryEntry) {
    tracing::warn!(key = %entry.key, error = %entry.error, "saving unsaved data to recovery log");
    if let Err(e) = append_entry(board_dir, &entry) {
        tracing::error!("could not write to recovery log: {}", e);
    }
}

fn append_entry(board_dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(board_dir);
    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())
}
