//! SQLite document-table backend.
//!
//! Each collection is one row of `collections(key, document, updated_at)`.
//! The connection must come from `db::open_db*` so the table exists.

use super::{RecordStore, StorageResult};
use crate::config::StorageBackend;
use rusqlite::{params, Connection, OptionalExtension};

/// SQLite-backed record store borrowing a bootstrapped connection.
#[derive(Debug, Clone, Copy)]
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Sqlite
    }

    fn read_document(&self, key: &str) -> StorageResult<Option<String>> {
        let document = self
            .conn
            .query_row(
                "SELECT document FROM collections WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(document)
    }

    fn write_document(&self, key: &str, document: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO collections (key, document)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                document = excluded.document,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, document],
        )?;
        Ok(())
    }
}
