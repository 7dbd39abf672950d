//! Storage module for persisting daily snapshots
//!
//! This module handles snapshot persistence, including:
//! - The `SnapshotStore` trait shared by all backends
//! - A local directory backend (file modification time as timestamp)
//! - A SQLite backend with payload checksums
//! - Selecting a backend from a connection string

mod directory;
mod schema;
mod sqlite;
mod traits;

pub use directory::DirectoryStore;
pub use sqlite::SqliteStore;
pub use traits::{validate_key, SnapshotMeta, SnapshotStore, StorageError, StorageResult};

use sha2::{Digest, Sha256};
use std::path::Path;

/// Hex-encoded SHA-256 of a snapshot payload
pub fn checksum(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Opens the backend named by a connection string
///
/// | Connection string | Backend |
/// |-------------------|---------|
/// | `sqlite://<path>` or `sqlite://:memory:` | [`SqliteStore`] |
/// | path ending in `.db`, `.sqlite`, `.sqlite3` | [`SqliteStore`] |
/// | `file://<dir>` | [`DirectoryStore`] |
/// | any other plain path | [`DirectoryStore`] |
///
/// Other URL schemes and `key=value;...` service strings are rejected with
/// [`StorageError::InvalidConnectionString`].
///
/// # Example
///
/// ```no_run
/// use gazette_scraper::storage::open_store;
///
/// let store = open_store("sqlite://./gazette.db").unwrap();
/// println!("{} snapshots", store.list().unwrap().len());
/// ```
pub fn open_store(connection_string: &str) -> StorageResult<Box<dyn SnapshotStore>> {
    let conn = connection_string.trim();

    if let Some(path) = conn.strip_prefix("sqlite://") {
        if path == ":memory:" {
            return Ok(Box::new(SqliteStore::open_in_memory()?));
        }
        return Ok(Box::new(SqliteStore::open(Path::new(path))?));
    }

    if let Some(path) = conn.strip_prefix("file://") {
        return Ok(Box::new(DirectoryStore::open(path)?));
    }

    if conn.is_empty() || conn.contains("://") || conn.contains(';') {
        return Err(StorageError::InvalidConnectionString(redact(conn)));
    }

    let path = Path::new(conn);
    let is_database = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("db" | "sqlite" | "sqlite3")
    );

    if is_database {
        Ok(Box::new(SqliteStore::open(path)?))
    } else {
        Ok(Box::new(DirectoryStore::open(path)?))
    }
}

/// Keeps only the part of a connection string before any credentials
fn redact(conn: &str) -> String {
    match conn.find(|c| c == ';' || c == '@') {
        Some(idx) => format!("{}...", &conn[..idx]),
        None => conn.to_string(),
    }
}
