use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::recovery::{RecoveryEntry, atomic_write, log_recovery};

/// Error type for key-value storage
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
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
}

/// Flat key → blob storage. Each key holds one whole serialized value.
pub trait Storage {
    /// Read the blob under `key`; `None` if it was never written.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Replace the blob under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Storage backed by a directory: key `K` lives in `K.json`.
///
/// Each write is an atomic replace. Callers that read, mutate and write
/// back hold a [`BoardLock`](super::lock::BoardLock) across the whole cycle.
/// A failed write is copied into the recovery log before the error returns.
#[derive(Debug, Clone)]
pub struct DirStorage {
    dir: PathBuf,
}

impl DirStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for DirStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read { path, source: e }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        if let Err(e) = atomic_write(&path, value.as_bytes()) {
            log_recovery(
                &self.dir,
                RecoveryEntry {
                    timestamp: Utc::now(),
                    key: key.to_string(),
                    error: e.to_string(),
                    body: value.to_string(),
                },
            );
            return Err(StorageError::Write { path, source: e });
        }
        Ok(())
    }
}

/// In-process storage, for tests and throwaway boards.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    /// Number of writes performed so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn dir_storage_round_trip() {
        let tmp = TempDir::new().unwrap();
        let mut storage = DirStorage::new(tmp.path());
        assert_eq!(storage.read("tasks").unwrap(), None);

        storage.write("tasks", "[]").unwrap();
        assert_eq!(storage.read("tasks").unwrap().as_deref(), Some("[]"));
        assert!(tmp.path().join("tasks.json").exists());
        // Locking is the caller's job
        assert!(!tmp.path().join(".lock").exists());
    }

    #[test]
    fn dir_storage_write_to_missing_dir_fails() {
        let tmp = TempDir::new().unwrap();
        let mut storage = DirStorage::new(tmp.path().join("gone"));
        assert!(storage.write("tasks", "[]").is_err());
    }

    #[test]
    fn memory_storage_counts_writes() {
        let mut storage = MemoryStorage::new().with("categories", "[]");
        assert_eq!(storage.read("categories").unwrap().as_deref(), Some("[]"));
        storage.write("tasks", "[]").unwrap();
        storage.write("tasks", "[1]").unwrap();
        assert_eq!(storage.writes(), 2);
        assert_eq!(storage.get("tasks"), Some("[1]"));
    }
}
