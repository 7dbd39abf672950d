//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the SnapshotStore
//! trait. Each row keeps a SHA-256 checksum of its payload which is verified
//! on every read.

use crate::storage::checksum;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{
    validate_key, SnapshotMeta, SnapshotStore, StorageError, StorageResult,
};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite storage backend
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens or creates a snapshot database
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Database("connection lock poisoned".to_string()))
    }
}

impl SnapshotStore for SqliteStore {
    fn put_at(&self, key: &str, data: &[u8], written_at: DateTime<Utc>) -> StorageResult<()> {
        validate_key(key)?;
        let conn = self.conn()?;

        let existing: Option<String> = conn
            .query_row(
                "SELECT key FROM snapshots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(StorageError::AlreadyExists(key.to_string()));
        }

        conn.execute(
            "INSERT INTO snapshots (key, payload, sha256, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                key,
                data,
                checksum(data),
                written_at.to_rfc3339_opts(SecondsFormat::Micros, true)
            ],
        )?;

        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<SnapshotMeta>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key, created_at FROM snapshots")?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(key, created_at)| {
                let written_at = DateTime::parse_from_rfc3339(&created_at)
                    .map_err(|e| {
                        StorageError::Database(format!(
                            "invalid created_at '{}' for {}: {}",
                            created_at, key, e
                        ))
                    })?
                    .with_timezone(&Utc);
                Ok(SnapshotMeta { key, written_at })
            })
            .collect()
    }

    fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        let conn = self.conn()?;

        let (payload, expected): (Vec<u8>, String) = conn
            .query_row(
                "SELECT payload, sha256 FROM snapshots WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;

        let actual = checksum(&payload);
        if actual != expected {
            return Err(StorageError::ChecksumMismatch {
                key: key.to_string(),
                expected,
                actual,
            });
        }

        Ok(payload)
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM snapshots WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}
