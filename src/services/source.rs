//! Where source tables come from.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, SystemTime};

use crate::error::PipelineError;
use crate::ingest::{read_raw_table_path, RawTable};

pub trait SourceProvider {
    /// Modification time of the source, `None` when it does not exist.
    fn modified(&self, path: &Path) -> Option<SystemTime>;

    /// Read the whole source as a raw table.
    fn read(&self, path: &Path) -> Result<RawTable, PipelineError>;
}

/// CSV files on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemSource;

impl SourceProvider for FileSystemSource {
    fn modified(&self, path: &Path) -> Option<SystemTime> {
        let metadata = std::fs::metadata(path).ok()?;
        if !metadata.is_file() {
            return None;
        }
        metadata.modified().ok()
    }

    fn read(&self, path: &Path) -> Result<RawTable, PipelineError> {
        read_raw_table_path(path)
    }
}

/// Tables held in memory. Every insert advances the table's modification time.
#[derive(Debug, Default)]
pub struct InMemorySource {
    tables: RwLock<HashMap<PathBuf, (SystemTime, RawTable)>>,
    clock: AtomicU64,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, table: RawTable) {
        let tick = self.clock.fetch_add(1, Ordering::SeqCst) + 1;
        let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(tick);
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        tables.insert(path.into(), (modified, table));
    }

    pub fn remove(&self, path: &Path) {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        tables.remove(path);
    }
}

impl SourceProvider for InMemorySource {
    fn modified(&self, path: &Path) -> Option<SystemTime> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        tables.get(path).map(|(modified, _)| *modified)
    }

    fn read(&self, path: &Path) -> Result<RawTable, PipelineError> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        tables
            .get(path)
            .map(|(_, table)| table.clone())
            .ok_or_else(|| PipelineError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such table"),
            })
    }
}
