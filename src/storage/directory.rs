//! Local directory storage implementation
//!
//! One file per snapshot; the file's modification time is the storage
//! timestamp.

use crate::storage::traits::{
    validate_key, SnapshotMeta, SnapshotStore, StorageError, StorageResult,
};
use chrono::{DateTime, Utc};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Snapshot store backed by a directory on disk
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Opens the store, creating the directory if needed
    pub fn open(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    /// Writes beside the target, then links it into place without replacing
    ///
    /// Readers never see a partial file. The temporary file is removed on
    /// every failure path, including losing a race for the same key.
    fn write_new(
        &self,
        key: &str,
        path: &Path,
        data: &[u8],
        written_at: DateTime<Utc>,
    ) -> StorageResult<()> {
        let mut tmp = tempfile::Builder::new()
            .prefix(".")
            .suffix(".tmp")
            .tempfile_in(&self.root)?;
        tmp.write_all(data)?;
        tmp.as_file().set_modified(SystemTime::from(written_at))?;
        tmp.as_file().sync_all()?;

        tmp.persist_noclobber(path).map_err(|e| match e.error.kind() {
            ErrorKind::AlreadyExists => StorageError::AlreadyExists(key.to_string()),
            _ => StorageError::Io(e.error),
        })?;

        Ok(())
    }
}

impl SnapshotStore for DirectoryStore {
    fn put_at(&self, key: &str, data: &[u8], written_at: DateTime<Utc>) -> StorageResult<()> {
        let path = self.path_for(key)?;
        if path.exists() {
            return Err(StorageError::AlreadyExists(key.to_string()));
        }

        self.write_new(key, &path, data, written_at)?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<SnapshotMeta>> {
        let mut snapshots = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let key = entry.file_name().to_string_lossy().into_owned();
            if key.starts_with('.') {
                continue;
            }

            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }

            snapshots.push(SnapshotMeta {
                key,
                written_at: DateTime::<Utc>::from(metadata.modified()?),
            });
        }

        Ok(snapshots)
    }

    fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.path_for(key)?;
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(key.to_string()),
            _ => StorageError::Io(e),
        })
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.path_for(key)?.is_file())
    }
}
