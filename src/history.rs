//! Persistent triage history: an append-only JSON file of completed
//! sessions.
//!
//! Single-owner store with an internal write lock — concurrent sessions
//! serialize their appends so the log is never interleaved. Reads are
//! lock-free against the last fully written file (writes go through a
//! temp file + rename).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use crate::models::HistoryEntry;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("history write lock poisoned")]
    LockPoisoned,
}

/// JSON-file-backed store of [`HistoryEntry`] records.
pub struct HistoryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one completed session. Entries are never mutated afterwards.
    pub fn append(&self, entry: HistoryEntry) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().map_err(|_| HistoryError::LockPoisoned)?;

        let mut entries = self.read_file()?;
        entries.push(entry);
        self.write_file(&entries)
    }

    /// All entries, newest first.
    pub fn all(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let mut entries = self.read_file()?;
        entries.reverse();
        Ok(entries)
    }

    /// The `limit` most recent entries, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, HistoryError> {
        let mut entries = self.all()?;
        entries.truncate(limit);
        Ok(entries)
    }

    /// Bulk clear — the only way history is ever deleted.
    pub fn clear(&self) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().map_err(|_| HistoryError::LockPoisoned)?;

        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    /// Entries in on-disk (chronological) order. Missing file = empty history.
    fn read_file(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write via temp file + rename so a crash mid-write never corrupts
    /// the log.
    fn write_file(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let staged = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&staged, json)?;
        fs::rename(&staged, &self.path)?;
        Ok(())
    }
}
