//! Application Configuration
//!
//! This module provides configuration management for the application,
//! supporting YAML configuration files with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use log::{info, warn};

/// Blob storage backend types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum BlobBackend {
    LocalDir,
    Mock,
}

impl Default for BlobBackend {
    fn default() -> Self {
        BlobBackend::LocalDir
    }
}

/// Metadata backend types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum MetadataBackend {
    JsonFile,
    Mock,
}

impl Default for MetadataBackend {
    fn default() -> Self {
        MetadataBackend::JsonFile
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Blob storage configuration
    pub storage: StorageConfig,
    /// Metadata configuration
    pub metadata: MetadataConfig,
    /// Admin access configuration
    pub admin: AdminConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Number of worker threads
    pub workers: usize,
    /// Maximum upload size in bytes
    pub max_upload_size: usize,
    /// Directory holding the browser front-end
    pub static_dir: String,
}

/// Blob storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Blob storage backend type
    pub backend: BlobBackend,
    /// Directory holding uploaded blobs
    pub uploads_dir: String,
}

/// Metadata backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Metadata backend type
    pub backend: MetadataBackend,
    /// Path of the JSON index document
    pub index_path: String,
}

/// Admin access configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Shared secret presented in the Admin-Password header
    pub secret: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Path to log4rs configuration file
    pub config_file: String,
}

impl AppConfig {
    /// Load configuration from file, use defaults if not found
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = "config.yaml";
        let mut config = if Path::new(config_path).exists() {
            let content = fs::read_to_string(config_path)?;
            let config: AppConfig = serde_yaml::from_str(&content)?;
            info!("Loaded configuration from {}", config_path);
            config
        } else {
            warn!("Config file not found, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment overrides on top of the file configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret) = env::var("FILESHELF_ADMIN_SECRET") {
            info!("Admin secret taken from FILESHELF_ADMIN_SECRET");
            self.admin.secret = secret;
        }
    }

    /// Create default configuration
    pub fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                workers: 4,
                max_upload_size: 104857600, // 100MB
                static_dir: "./static".to_string(),
            },
            storage: StorageConfig {
                backend: BlobBackend::LocalDir,
                uploads_dir: "./data/uploads".to_string(),
            },
            metadata: MetadataConfig {
                backend: MetadataBackend::JsonFile,
                index_path: "./data/files.json".to_string(),
            },
            admin: AdminConfig {
                secret: "changeme".to_string(),
            },
            logging: LoggingConfig {
                config_file: "server_log.yaml".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.backend, BlobBackend::LocalDir);
        assert_eq!(config.metadata.backend, MetadataBackend::JsonFile);
        assert_eq!(config.metadata.index_path, "./data/files.json");
        assert!(!config.admin.secret.is_empty());
    }

    #[test]
    fn test_config_parses_from_yaml() {
        let yaml = r#"
server:
  host: "0.0.0.0"
  port: 8080
  workers: 2
  max_upload_size: 1048576
  static_dir: "./static"
storage:
  backend: Mock
  uploads_dir: "/tmp/uploads"
metadata:
  backend: Mock
  index_path: "/tmp/files.json"
admin:
  secret: "s3cret"
logging:
  config_file: "server_log.yaml"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.backend, BlobBackend::Mock);
        assert_eq!(config.metadata.backend, MetadataBackend::Mock);
        assert_eq!(config.admin.secret, "s3cret");
    }

    #[test]
    #[serial]
    fn test_admin_secret_env_override() {
        std::env::set_var("FILESHELF_ADMIN_SECRET", "from-env");
        let mut config = AppConfig::default();
        config.apply_env_overrides();
        assert_eq!(config.admin.secret, "from-env");

        std::env::remove_var("FILESHELF_ADMIN_SECRET");
        let mut config = AppConfig::default();
        config.apply_env_overrides();
        assert_eq!(config.admin.secret, "changeme");
    }
}
