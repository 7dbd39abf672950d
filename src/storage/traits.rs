//! Storage traits and error types
//!
//! This module defines the trait interface for snapshot storage backends and
//! associated error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Snapshot not found: {0}")]
    NotFound(String),

    #[error("Snapshot already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid snapshot key: {0}")]
    InvalidKey(String),

    #[error("Checksum mismatch for snapshot {key}: stored {expected}, computed {actual}")]
    ChecksumMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("Unsupported connection string: {0}")]
    InvalidConnectionString(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Listing entry for one stored snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotMeta {
    pub key: String,
    /// When the backend recorded the write
    pub written_at: DateTime<Utc>,
}

/// Trait for snapshot storage backends
///
/// Snapshots are write-once: a second write to an existing key fails with
/// [`StorageError::AlreadyExists`] and leaves the stored bytes untouched.
/// Implementations must be safe to share between request handlers.
pub trait SnapshotStore: Send + Sync {
    /// Stores `data` under `key`, recording `written_at` as its timestamp
    fn put_at(&self, key: &str, data: &[u8], written_at: DateTime<Utc>) -> StorageResult<()>;

    /// Stores `data` under `key` with the current time
    fn put(&self, key: &str, data: &[u8]) -> StorageResult<()> {
        self.put_at(key, data, Utc::now())
    }

    /// Lists every stored snapshot, in no particular order
    fn list(&self) -> StorageResult<Vec<SnapshotMeta>>;

    /// Returns the exact bytes stored under `key`
    fn get(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Returns true if a snapshot is stored under `key`
    fn exists(&self, key: &str) -> StorageResult<bool>;
}

/// Rejects keys that could escape a directory or hide from listings
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty()
        || key.starts_with('.')
        || key.contains('/')
        || key.contains('\\')
        || key.contains('\0')
    {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
