//! Mock implementation of BlobStore trait for testing

use crate::storage::{generate_filename, is_safe_filename, BlobError, BlobStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory blob store
pub struct MockBlobStore {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MockBlobStore {
    /// Create a new mock blob store
    pub fn new() -> Self {
        Self {
            blobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of stored blobs
    pub fn blob_count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }
}

impl Default for MockBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for MockBlobStore {
    fn put(&self, content: &[u8], original_name: &str) -> Result<String, BlobError> {
        let filename = generate_filename(original_name);
        self.blobs
            .lock()
            .unwrap()
            .insert(filename.clone(), content.to_vec());
        Ok(filename)
    }

    fn read(&self, filename: &str) -> Result<Vec<u8>, BlobError> {
        if !is_safe_filename(filename) {
            return Err(BlobError::NotFound(filename.to_string()));
        }
        self.blobs
            .lock()
            .unwrap()
            .get(filename)
            .cloned()
            .ok_or_else(|| BlobError::NotFound(filename.to_string()))
    }

    fn delete(&self, filename: &str) -> Result<(), BlobError> {
        self.blobs
            .lock()
            .unwrap()
            .remove(filename)
            .map(|_| ())
            .ok_or_else(|| BlobError::NotFound(filename.to_string()))
    }
}
