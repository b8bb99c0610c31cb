//! Storage location and backend selection.
//!
//! # Responsibility
//! - Carry the data directory every store is built from.
//! - Select which durable medium backs the record collections.
//!
//! # Invariants
//! - Paths are derived from `data_dir` only; there is no process-global
//!   location, so tests can point each store at its own directory.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DEFAULT_DATA_DIR: &str = "data";
const SQLITE_FILE_NAME: &str = "hotel_store.db";

/// Durable medium used for record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// One pretty-printed JSON document per collection.
    #[default]
    JsonFiles,
    /// JSON documents stored in a SQLite `collections` table.
    Sqlite,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JsonFiles => "json",
            Self::Sqlite => "sqlite",
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a backend name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBackend(pub String);

impl Display for UnknownBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported storage backend `{}`; expected json|sqlite",
            self.0
        )
    }
}

impl Error for UnknownBackend {}

impl FromStr for StorageBackend {
    type Err = UnknownBackend;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::JsonFiles),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(UnknownBackend(other.to_string())),
        }
    }
}

/// Explicit storage configuration handed to store constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding JSON collections or the SQLite database file.
    pub data_dir: PathBuf,
    /// Selected durable medium.
    pub backend: StorageBackend,
}

impl StorageConfig {
    /// Creates a JSON-file configuration rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            backend: StorageBackend::JsonFiles,
        }
    }

    pub fn with_backend(mut self, backend: StorageBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn data_dir(&self) -> &Path {
        self.data_dir.as_path()
    }

    /// Location of the SQLite database file for the `Sqlite` backend.
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join(SQLITE_FILE_NAME)
    }

    /// Location of the JSON document for collection `key`.
    pub fn collection_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}
