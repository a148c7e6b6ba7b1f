//! Directory of per-token JSON history files

use super::record::{history_file_name, HistoryRecord};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// History store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Record could not be serialized
    #[error("Failed to encode history record: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result of a write request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// File created at this path
    Written(PathBuf),
    /// Nothing to persist
    EmptyHistory,
}

/// Storage for collected histories, keyed by (slug, token id)
pub trait HistoryStore: Send {
    /// Whether a history for this pair is already stored
    fn exists(&self, slug: &str, token_id: &str) -> bool;

    /// Persist a history; empty histories are not written
    fn write(
        &mut self,
        slug: &str,
        token_id: &str,
        record: &HistoryRecord,
    ) -> Result<WriteOutcome, StoreError>;
}

/// JSON files in a single output directory
///
/// The directory is listed once when the store is opened; later writes
/// extend that listing in memory.
pub struct JsonHistoryStore {
    dir: PathBuf,
    existing: HashSet<String>,
}

impl JsonHistoryStore {
    /// Open (creating if needed) the output directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let mut existing = HashSet::new();
        for entry in fs::read_dir(&dir).map_err(|e| StoreError::io(&dir, e))? {
            let entry = entry.map_err(|e| StoreError::io(&dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".json") && !name.starts_with('.') {
                existing.insert(name);
            }
        }

        tracing::info!(dir = ?dir, existing = existing.len(), "Opened history store");
        Ok(Self { dir, existing })
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of histories currently stored
    pub fn len(&self) -> usize {
        self.existing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.existing.is_empty()
    }

    /// Path the history for this pair lives at
    pub fn path_for(&self, slug: &str, token_id: &str) -> PathBuf {
        self.dir.join(history_file_name(slug, token_id))
    }
}

impl HistoryStore for JsonHistoryStore {
    fn exists(&self, slug: &str, token_id: &str) -> bool {
        self.existing.contains(&history_file_name(slug, token_id))
    }

    fn write(
        &mut self,
        slug: &str,
        token_id: &str,
        record: &HistoryRecord,
    ) -> Result<WriteOutcome, StoreError> {
        if record.history.is_empty() {
            return Ok(WriteOutcome::EmptyHistory);
        }

        let file_name = history_file_name(slug, token_id);
        let path = self.dir.join(&file_name);
        let tmp_path = self.dir.join(format!(".{}.tmp", file_name));

        let content = serde_json::to_vec_pretty(record)?;
        fs::write(&tmp_path, content).map_err(|e| StoreError::io(&tmp_path, e))?;
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::io(&path, e));
        }

        self.existing.insert(file_name);
        Ok(WriteOutcome::Written(path))
    }
}
