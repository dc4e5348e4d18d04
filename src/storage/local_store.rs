//! Local uploads-directory blob store

use crate::storage::{generate_filename, is_safe_filename, BlobError, BlobStore};
use log::info;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Flat-directory blob store: one file per upload under the configured root
pub struct LocalDirBlobStore {
    root: PathBuf,
}

impl LocalDirBlobStore {
    /// Create the store, creating the uploads directory if absent
    pub fn new<P: Into<PathBuf>>(root: P) -> Result<Self, BlobError> {
        let root = root.into();
        if !root.exists() {
            fs::create_dir_all(&root)?;
            info!("Created uploads directory {}", root.display());
        }
        Ok(Self { root })
    }

    /// Map a filename to its location under the store root. Names that
    /// would escape the root resolve to NotFound.
    fn resolve_path(&self, filename: &str) -> Result<PathBuf, BlobError> {
        if !is_safe_filename(filename) {
            return Err(BlobError::NotFound(filename.to_string()));
        }
        Ok(self.root.join(filename))
    }
}

impl BlobStore for LocalDirBlobStore {
    fn put(&self, content: &[u8], original_name: &str) -> Result<String, BlobError> {
        let filename = generate_filename(original_name);
        let path = self.resolve_path(&filename)?;
        fs::write(&path, content)?;
        info!(
            "Stored blob {} ({} bytes) for original {}",
            filename,
            content.len(),
            original_name
        );
        Ok(filename)
    }

    fn read(&self, filename: &str) -> Result<Vec<u8>, BlobError> {
        let path = self.resolve_path(filename)?;
        fs::read(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                BlobError::NotFound(filename.to_string())
            } else {
                BlobError::Io(e)
            }
        })
    }

    fn delete(&self, filename: &str) -> Result<(), BlobError> {
        let path = self.resolve_path(filename)?;
        fs::remove_file(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                BlobError::NotFound(filename.to_string())
            } else {
                BlobError::Io(e)
            }
        })?;
        info!("Deleted blob {}", filename);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_local_blob_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = LocalDirBlobStore::new(dir.path().join("uploads")).unwrap();

        let filename = store.put(b"hello blob", "greeting.txt").unwrap();
        assert!(filename.ends_with("-greeting.txt"));

        let content = store.read(&filename).unwrap();
        assert_eq!(content, b"hello blob");

        store.delete(&filename).unwrap();
        assert!(matches!(
            store.read(&filename),
            Err(BlobError::NotFound(_))
        ));
    }

    #[test]
    fn test_creates_uploads_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("a").join("b");
        LocalDirBlobStore::new(&root).unwrap();
        assert!(root.is_dir());
    }

    #[test]
    fn test_delete_absent_blob_is_not_found() {
        let dir = tempdir().unwrap();
        let store = LocalDirBlobStore::new(dir.path()).unwrap();
        assert!(matches!(
            store.delete("123-missing.txt"),
            Err(BlobError::NotFound(_))
        ));
    }

    #[test]
    fn test_traversal_lookups_are_not_found() {
        let dir = tempdir().unwrap();
        let store = LocalDirBlobStore::new(dir.path().join("uploads")).unwrap();

        // a real file outside the store root must stay unreachable
        fs::write(dir.path().join("secret.txt"), b"secret").unwrap();

        assert!(matches!(
            store.read("../secret.txt"),
            Err(BlobError::NotFound(_))
        ));
        assert!(matches!(
            store.delete("../secret.txt"),
            Err(BlobError::NotFound(_))
        ));
        assert!(dir.path().join("secret.txt").exists());
    }

    #[test]
    fn test_put_sanitizes_hostile_original_name() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("uploads");
        let store = LocalDirBlobStore::new(&root).unwrap();

        let filename = store.put(b"data", "../../escape.txt").unwrap();
        assert!(root.join(&filename).exists());
        assert!(!dir.path().join("escape.txt").exists());
    }
}
