//! JSON index document metadata store
//!
//! The authoritative list of file records, held in memory and rewritten in
//! full to one JSON document on every mutation. The mutex is held across the
//! whole read-modify-persist sequence so concurrent mutations cannot lose
//! each other's changes during the full-list rewrite.

use crate::metadata::{FileRecord, MetadataPatch, MetadataStore, StoreError};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct JsonFileMetadataStore {
    records: Mutex<Vec<FileRecord>>,
    index_path: PathBuf,
}

impl JsonFileMetadataStore {
    /// Open the store, rehydrating from the index document if present.
    ///
    /// A missing document is an empty store. A present-but-unparseable
    /// document is an error: starting with an empty list would silently
    /// discard user data on the next rewrite.
    pub fn open<P: AsRef<Path>>(index_path: P) -> Result<Self, StoreError> {
        let index_path = index_path.as_ref().to_path_buf();
        let records = if index_path.exists() {
            let content = fs::read_to_string(&index_path)?;
            let records: Vec<FileRecord> =
                serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                    path: index_path.display().to_string(),
                    source,
                })?;
            info!(
                "Loaded {} file records from {}",
                records.len(),
                index_path.display()
            );
            records
        } else {
            info!(
                "No file index at {}, starting empty",
                index_path.display()
            );
            Vec::new()
        };

        Ok(Self {
            records: Mutex::new(records),
            index_path,
        })
    }

    /// Rewrite the full document. Called with the records lock held.
    fn persist(&self, records: &[FileRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.index_path, json)?;
        Ok(())
    }
}

impl MetadataStore for JsonFileMetadataStore {
    fn list(&self) -> Result<Vec<FileRecord>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records.clone())
    }

    fn find(&self, filename: &str) -> Result<Option<FileRecord>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.filename == filename).cloned())
    }

    fn append(&self, record: FileRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();

        if records.iter().any(|r| r.filename == record.filename) {
            return Err(StoreError::Duplicate(record.filename));
        }

        records.push(record);
        if let Err(e) = self.persist(&records) {
            // roll back so memory never diverges from the document
            records.pop();
            return Err(e);
        }
        Ok(())
    }

    fn update(&self, filename: &str, patch: &MetadataPatch) -> Result<FileRecord, StoreError> {
        let mut records = self.records.lock().unwrap();

        let idx = records
            .iter()
            .position(|r| r.filename == filename)
            .ok_or_else(|| StoreError::NotFound(filename.to_string()))?;

        let previous = records[idx].clone();
        records[idx].apply(patch);
        if let Err(e) = self.persist(&records) {
            records[idx] = previous;
            return Err(e);
        }
        Ok(records[idx].clone())
    }

    fn remove(&self, filename: &str) -> Result<FileRecord, StoreError> {
        let mut records = self.records.lock().unwrap();

        let idx = records
            .iter()
            .position(|r| r.filename == filename)
            .ok_or_else(|| StoreError::NotFound(filename.to_string()))?;

        let removed = records.remove(idx);
        if let Err(e) = self.persist(&records) {
            records.insert(idx, removed);
            return Err(e);
        }
        Ok(removed)
    }
}
