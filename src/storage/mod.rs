//! Blob Storage Layer Abstraction
//!
//! This module provides an abstraction over blob storage backends,
//! allowing the system to use different implementations (a local uploads
//! directory, in-memory mocks for testing) without affecting the handlers.

pub mod local_store;
pub mod mock_store;

use chrono::Utc;
use thiserror::Error;

/// Blob store failures. `NotFound` covers both genuinely absent blobs and
/// rejected path-traversal lookups, so callers can tell "already gone" apart
/// from an I/O failure.
#[derive(Error, Debug)]
pub enum BlobError {
    #[error("no blob for filename: {0}")]
    NotFound(String),
    #[error("blob I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait defining the blob storage interface
pub trait BlobStore: Send + Sync {
    /// Write content under a freshly generated name and return that name
    fn put(&self, content: &[u8], original_name: &str) -> Result<String, BlobError>;

    /// Read a blob's full content
    fn read(&self, filename: &str) -> Result<Vec<u8>, BlobError>;

    /// Delete a blob. Returns `BlobError::NotFound` when it was already
    /// absent so the caller can still treat the metadata removal as done.
    fn delete(&self, filename: &str) -> Result<(), BlobError>;
}

/// Generate a storage name for an upload: millisecond timestamp plus the
/// sanitized original name, so names stay unique and human-debuggable.
/// Two same-millisecond uploads of the same original name would collide and
/// the last writer wins; accepted limitation at this scale.
pub fn generate_filename(original_name: &str) -> String {
    let safe = sanitize_filename::sanitize(original_name);
    let safe = if safe.is_empty() {
        "upload.bin".to_string()
    } else {
        safe
    };
    format!("{}-{}", Utc::now().timestamp_millis(), safe)
}

/// True when the filename is a plain name that stays inside the store root.
/// Separators and parent references are treated as lookups for a blob that
/// does not exist, never resolved.
pub fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains('/')
        && !filename.contains('\\')
        && filename != "."
        && filename != ".."
}
