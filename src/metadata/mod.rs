//! Metadata Storage Layer Abstraction
//!
//! This module provides an abstraction over metadata storage backends,
//! allowing the system to use different implementations (the JSON index
//! document, in-memory mocks for testing) without affecting the handlers.

pub mod json_store;
pub mod mock_store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metadata entry describing one uploaded file.
///
/// `filename` is the server-generated blob name and the sole lookup key;
/// only `title` and `description` are mutable after upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub title: String,
    pub description: String,
    pub filename: String,
    pub original_name: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Partial update of a record's mutable fields.
///
/// An absent field leaves the record untouched; a present-but-empty string
/// overwrites.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl FileRecord {
    /// Apply a patch to the mutable fields
    pub fn apply(&mut self, patch: &MetadataPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
    }
}

/// Metadata store failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no record for filename: {0}")]
    NotFound(String),
    #[error("record already exists for filename: {0}")]
    Duplicate(String),
    #[error("file index at {path} is not valid JSON: {source}")]
    Corrupt {
        path: String,
        source: serde_json::Error,
    },
    #[error("failed to persist file index: {0}")]
    Persist(#[from] std::io::Error),
    #[error("failed to encode file index: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Trait defining the metadata storage interface
///
/// Mutating calls are write-through: the backing document reflects the change
/// before the call returns, or the in-memory state is rolled back and an
/// error is returned.
pub trait MetadataStore: Send + Sync {
    /// Return all live records in insertion order
    fn list(&self) -> Result<Vec<FileRecord>, StoreError>;

    /// Look up a record by its generated filename
    fn find(&self, filename: &str) -> Result<Option<FileRecord>, StoreError>;

    /// Add a record to the end of the list
    fn append(&self, record: FileRecord) -> Result<(), StoreError>;

    /// Apply a patch to the matching record and return the updated record
    fn update(&self, filename: &str, patch: &MetadataPatch) -> Result<FileRecord, StoreError>;

    /// Remove the matching record and return it so the caller can delete the blob
    fn remove(&self, filename: &str) -> Result<FileRecord, StoreError>;
}

#[cfg(test)]
pub(crate) fn test_record(filename: &str, title: &str) -> FileRecord {
    FileRecord {
        title: title.to_string(),
        description: format!("{title} description"),
        filename: filename.to_string(),
        original_name: "original.bin".to_string(),
        uploaded_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_with_camel_case_fields() {
        let record = test_record("123-a.txt", "A");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("originalName").is_some());
        assert!(json.get("uploadedAt").is_some());
        assert!(json.get("original_name").is_none());
    }

    #[test]
    fn test_patch_absent_field_is_untouched() {
        let mut record = test_record("123-a.txt", "A");
        record.apply(&MetadataPatch {
            title: Some("B".into()),
            description: None,
        });
        assert_eq!(record.title, "B");
        assert_eq!(record.description, "A description");
    }

    #[test]
    fn test_patch_empty_string_overwrites() {
        let mut record = test_record("123-a.txt", "A");
        record.apply(&MetadataPatch {
            title: None,
            description: Some(String::new()),
        });
        assert_eq!(record.title, "A");
        assert_eq!(record.description, "");
    }
}
