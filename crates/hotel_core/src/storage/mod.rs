//! Storage gateway for keyed record collections.
//!
//! # Responsibility
//! - Load and save whole `id -> record` collections as JSON documents.
//! - Keep every I/O and parse failure inside this boundary.
//!
//! # Invariants
//! - `load` never fails: a missing document is an empty collection, and an
//!   unreadable one is logged and also treated as empty.
//! - `save` never fails: write errors are logged and the caller's in-memory
//!   state stands.
//! - Collection keys match `^[a-z][a-z0-9_]*$`.

use crate::config::StorageBackend;
use crate::db::DbError;
use log::{debug, error};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod json_file;
mod sqlite;

pub use json_file::JsonFileStore;
pub use sqlite::SqliteRecordStore;

static COLLECTION_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("valid collection key regex"));

const DOCUMENT_INDENT: &[u8] = b"    ";

/// Persisted form of one entity type, keyed by entity id.
pub type Collection<R> = BTreeMap<String, R>;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure inside the storage gateway.
#[derive(Debug)]
pub enum StorageError {
    /// Collection key does not match the allowed pattern.
    InvalidKey(String),
    Io {
        key: String,
        source: std::io::Error,
    },
    /// Document could not be encoded or parsed.
    Json {
        key: String,
        source: serde_json::Error,
    },
    Db(DbError),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(key) => write!(f, "invalid collection key `{key}`"),
            Self::Io { key, source } => write!(f, "collection `{key}` I/O failure: {source}"),
            Self::Json { key, source } => {
                write!(f, "collection `{key}` is not a valid document: {source}")
            }
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidKey(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable medium holding one JSON document per collection key.
///
/// Backends implement raw document access; the provided methods layer
/// key validation, (de)serialization and the lossy recovery policy on top.
pub trait RecordStore {
    /// Medium identifier used in log events.
    fn backend(&self) -> StorageBackend;

    /// Reads the raw document for `key`, `Ok(None)` when it does not exist.
    fn read_document(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replaces the raw document for `key`.
    fn write_document(&self, key: &str, document: &str) -> StorageResult<()>;

    /// Loads a collection, surfacing every failure as a typed error.
    fn try_load<R: DeserializeOwned>(&self, key: &str) -> StorageResult<Collection<R>> {
        validate_key(key)?;
        match self.read_document(key)? {
            Some(document) => decode_collection(key, &document),
            None => Ok(Collection::new()),
        }
    }

    /// Saves a collection, surfacing every failure as a typed error.
    fn try_save<R: Serialize>(&self, key: &str, records: &Collection<R>) -> StorageResult<()> {
        validate_key(key)?;
        let document = encode_collection(key, records)?;
        self.write_document(key, &document)
    }

    /// Loads a collection; failures are logged and yield an empty one.
    fn load<R: DeserializeOwned>(&self, key: &str) -> Collection<R> {
        match self.try_load(key) {
            Ok(records) => records,
            Err(err) => {
                error!(
                    "event=storage_load module=storage status=error backend={} key={key} error={err}",
                    self.backend()
                );
                Collection::new()
            }
        }
    }

    /// Saves a collection; failures are logged and otherwise ignored.
    fn save<R: Serialize>(&self, key: &str, records: &Collection<R>) {
        match self.try_save(key, records) {
            Ok(()) => debug!(
                "event=storage_save module=storage status=ok backend={} key={key} records={}",
                self.backend(),
                records.len()
            ),
            Err(err) => error!(
                "event=storage_save module=storage status=error backend={} key={key} error={err}",
                self.backend()
            ),
        }
    }
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn backend(&self) -> StorageBackend {
        (**self).backend()
    }

    fn read_document(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).read_document(key)
    }

    fn write_document(&self, key: &str, document: &str) -> StorageResult<()> {
        (**self).write_document(key, document)
    }
}

/// Rejects keys that could escape the data directory or table namespace.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if COLLECTION_KEY_RE.is_match(key) {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

fn decode_collection<R: DeserializeOwned>(
    key: &str,
    document: &str,
) -> StorageResult<Collection<R>> {
    serde_json::from_str(document).map_err(|source| StorageError::Json {
        key: key.to_string(),
        source,
    })
}

fn encode_collection<R: Serialize>(key: &str, records: &Collection<R>) -> StorageResult<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(DOCUMENT_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    records
        .serialize(&mut serializer)
        .map_err(|source| StorageError::Json {
            key: key.to_string(),
            source,
        })?;
    // serde_json only ever emits UTF-8.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::{decode_collection, encode_collection, validate_key, Collection, StorageError};

    #[test]
    fn validate_key_accepts_plain_names() {
        validate_key("hotels").expect("plain key should pass");
        validate_key("audit_log2").expect("underscore and digits should pass");
    }

    #[test]
    fn validate_key_rejects_path_like_names() {
        for key in ["", "../hotels", "Hotels", "hotels.json", "2hotels", "a/b"] {
            let err = validate_key(key).expect_err("key should be rejected");
            assert!(matches!(err, StorageError::InvalidKey(ref k) if k == key));
        }
    }

    #[test]
    fn encoded_documents_use_four_space_indent() {
        let mut records: Collection<u32> = Collection::new();
        records.insert("a".to_string(), 1);
        let document = encode_collection("numbers", &records).expect("encode should succeed");
        assert_eq!(document, "{\n    \"a\": 1\n}");
    }

    #[test]
    fn decode_reports_key_on_parse_failure() {
        let err = decode_collection::<u32>("numbers", "NOT JSON").expect_err("must fail");
        assert!(err.to_string().contains("numbers"));
    }
}
