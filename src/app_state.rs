//! Application state
//!
//! Both stores are owned here and injected into handlers through
//! `web::Data`, so nothing in the system reaches for module-global state.

use std::path::Path;
use std::sync::Arc;
use log::info;

use crate::config::{AppConfig, BlobBackend, MetadataBackend};
use crate::metadata::{json_store::JsonFileMetadataStore, mock_store::MockMetadataStore, MetadataStore};
use crate::storage::{local_store::LocalDirBlobStore, mock_store::MockBlobStore, BlobStore};

/// Application state containing the stores and the configuration
#[derive(Clone)]
pub struct AppState {
    pub blob_store: Arc<dyn BlobStore>,
    pub metadata_store: Arc<dyn MetadataStore>,
    pub config: AppConfig,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// Startup is the one place a failure is fatal: an unreadable file index
    /// must stop the process rather than run against an empty list.
    pub fn from_config(config: AppConfig) -> Self {
        let blob_store: Arc<dyn BlobStore> = match config.storage.backend {
            BlobBackend::LocalDir => {
                info!(
                    "Using local blob store with uploads_dir: {}",
                    config.storage.uploads_dir
                );
                Arc::new(
                    LocalDirBlobStore::new(&config.storage.uploads_dir)
                        .expect("failed to prepare uploads directory"),
                )
            }
            BlobBackend::Mock => {
                info!("Using mock blob store");
                Arc::new(MockBlobStore::new())
            }
        };

        let metadata_store: Arc<dyn MetadataStore> = match config.metadata.backend {
            MetadataBackend::JsonFile => {
                info!(
                    "Using JSON file index with index_path: {}",
                    config.metadata.index_path
                );
                if let Some(parent) = Path::new(&config.metadata.index_path).parent() {
                    std::fs::create_dir_all(parent)
                        .expect("failed to prepare file index directory");
                }
                Arc::new(
                    JsonFileMetadataStore::open(&config.metadata.index_path)
                        .expect("failed to load file index"),
                )
            }
            MetadataBackend::Mock => {
                info!("Using mock metadata store");
                Arc::new(MockMetadataStore::new())
            }
        };

        Self {
            blob_store,
            metadata_store,
            config,
        }
    }

    /// Create application state for testing with mock backends
    pub fn new_for_testing() -> Self {
        let mut config = AppConfig::default();
        config.storage.backend = BlobBackend::Mock;
        config.metadata.backend = MetadataBackend::Mock;

        Self {
            blob_store: Arc::new(MockBlobStore::new()),
            metadata_store: Arc::new(MockMetadataStore::new()),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_for_testing_uses_mocks() {
        let state = AppState::new_for_testing();
        assert_eq!(state.config.storage.backend, BlobBackend::Mock);
        assert!(state.metadata_store.list().unwrap().is_empty());
    }

    #[test]
    fn test_state_from_config_with_real_backends() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.storage.uploads_dir = dir
            .path()
            .join("uploads")
            .to_string_lossy()
            .into_owned();
        config.metadata.index_path = dir
            .path()
            .join("data")
            .join("files.json")
            .to_string_lossy()
            .into_owned();

        let state = AppState::from_config(config);
        assert!(state.metadata_store.list().unwrap().is_empty());

        let filename = state.blob_store.put(b"x", "a.txt").unwrap();
        assert_eq!(state.blob_store.read(&filename).unwrap(), b"x");
    }
}
