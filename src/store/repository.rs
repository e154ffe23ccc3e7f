//! Record persistence behind a load/save seam.
//!
//! The aggregate is one JSON document: `load` reads it in full, `save`
//! rewrites it in full. There are no partial writes and no schema
//! versioning; a missing file loads as an empty record.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::models::HealthRecord;

use super::StoreError;

/// Load/save seam for the aggregate health record.
pub trait RecordRepository: Send + Sync {
    fn load(&self) -> Result<HealthRecord, StoreError>;
    fn save(&self, record: &HealthRecord) -> Result<(), StoreError>;
}

/// File-backed repository: one pretty-printed JSON document.
///
/// Saves go through a temp file in the same directory followed by an atomic
/// rename, so a crash mid-write leaves the previous snapshot intact.
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordRepository for JsonFileRepository {
    fn load(&self) -> Result<HealthRecord, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(HealthRecord::default());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, record: &HealthRecord) -> Result<(), StoreError> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        serde_json::to_writer_pretty(&mut tmp, record)?;
        tmp.flush()?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::Persist(e.to_string()))?;
        Ok(())
    }
}

/// In-memory repository for tests and ephemeral runs.
pub struct MemoryRepository {
    record: Mutex<HealthRecord>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            record: Mutex::new(HealthRecord::default()),
        }
    }

    pub fn with_record(record: HealthRecord) -> Self {
        Self {
            record: Mutex::new(record),
        }
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordRepository for MemoryRepository {
    fn load(&self) -> Result<HealthRecord, StoreError> {
        Ok(self
            .record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, record: &HealthRecord) -> Result<(), StoreError> {
        *self
            .record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = record.clone();
        Ok(())
    }
}
