//! One-JSON-file-per-collection backend.
//!
//! # Invariants
//! - Collection `key` lives at `<data_dir>/<key>.json`.
//! - Writes go to a uniquely named sibling and are renamed into place, so
//!   readers see either the previous document or the new one.

use super::{RecordStore, StorageError, StorageResult};
use crate::config::{StorageBackend, StorageConfig};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File-backed record store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    config: StorageConfig,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::from_config(&StorageConfig::new(data_dir))
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            config: config.clone().with_backend(StorageBackend::JsonFiles),
        }
    }

    pub fn data_dir(&self) -> &Path {
        self.config.data_dir()
    }

    /// Path of the document backing collection `key`.
    pub fn collection_path(&self, key: &str) -> PathBuf {
        self.config.collection_path(key)
    }
}

impl RecordStore for JsonFileStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::JsonFiles
    }

    fn read_document(&self, key: &str) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.collection_path(key)) {
            Ok(document) => Ok(Some(document)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write_document(&self, key: &str, document: &str) -> StorageResult<()> {
        let io_error = |source: std::io::Error| StorageError::Io {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(self.data_dir()).map_err(io_error)?;

        let target = self.collection_path(key);
        let staging = self
            .data_dir()
            .join(format!(".{key}.{}.tmp", Uuid::new_v4().simple()));

        let written = fs::write(&staging, document).and_then(|()| fs::rename(&staging, &target));
        if let Err(source) = written {
            let _ = fs::remove_file(&staging);
            return Err(io_error(source));
        }
        Ok(())
    }
}
