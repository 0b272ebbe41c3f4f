//! Storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where judgments and results are kept
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Root directory of the file backend
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// JSON node list registered as a hierarchy at startup
    pub hierarchy_file: Option<PathBuf>,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == StorageBackend::File && self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("storage.data_dir"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
            hierarchy_file: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data/judgments")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_memory() {
        let config = StorageConfig::default();
        assert_eq!(config.backend, StorageBackend::Memory);
        assert!(config.hierarchy_file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_backend_needs_directory() {
        let config = StorageConfig {
            backend: StorageBackend::File,
            data_dir: PathBuf::new(),
            hierarchy_file: None,
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("storage.data_dir"))
        ));
    }
}
