//! Mock implementation of MetadataStore trait for testing

use crate::metadata::{FileRecord, MetadataPatch, MetadataStore, StoreError};
use std::sync::{Arc, Mutex};

/// In-memory metadata store with no backing document
pub struct MockMetadataStore {
    records: Arc<Mutex<Vec<FileRecord>>>,
}

impl MockMetadataStore {
    /// Create a new mock metadata store
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Clear all records (useful for test cleanup)
    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }

    /// Number of live records
    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl Default for MockMetadataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataStore for MockMetadataStore {
    fn list(&self) -> Result<Vec<FileRecord>, StoreError> {
        Ok(self.records.lock().unwrap().clone())
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
        Ok(())
    }

    fn update(&self, filename: &str, patch: &MetadataPatch) -> Result<FileRecord, StoreError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.filename == filename)
            .ok_or_else(|| StoreError::NotFound(filename.to_string()))?;
        record.apply(patch);
        Ok(record.clone())
    }

    fn remove(&self, filename: &str) -> Result<FileRecord, StoreError> {
        let mut records = self.records.lock().unwrap();
        let idx = records
            .iter()
            .position(|r| r.filename == filename)
            .ok_or_else(|| StoreError::NotFound(filename.to_string()))?;
        Ok(records.remove(idx))
    }
}
