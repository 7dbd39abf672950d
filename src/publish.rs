//! Snapshot publishing and retrieval
//!
//! A snapshot is the JSON array of one day's records, stored once under
//! `prefix + DD.MM.YYYY + suffix` and never rewritten.

use crate::config::StorageConfig;
use crate::record::Record;
use crate::storage::{checksum, SnapshotMeta, SnapshotStore, StorageError, StorageResult};
use crate::GazetteError;
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use std::sync::Arc;

/// Date format used in records and snapshot keys
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Formats a snapshot date as `DD.MM.YYYY`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a `DD.MM.YYYY` date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Today's date at the given UTC offset
pub fn today(utc_offset_hours: i32) -> NaiveDate {
    let offset = FixedOffset::east_opt(utc_offset_hours * 3600).unwrap_or(Utc.fix());
    Utc::now().with_timezone(&offset).date_naive()
}

/// Result of a publish attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A new snapshot was stored
    Written {
        key: String,
        records: usize,
        bytes: usize,
        checksum: String,
    },
    /// A snapshot for the day already exists and was left untouched
    AlreadyPublished { key: String },
}

/// Writes daily snapshots and serves the latest one
#[derive(Clone)]
pub struct Publisher {
    store: Arc<dyn SnapshotStore>,
    key_prefix: String,
    key_suffix: String,
}

impl Publisher {
    pub fn new(store: Arc<dyn SnapshotStore>, config: &StorageConfig) -> Self {
        Self {
            store,
            key_prefix: config.key_prefix.clone(),
            key_suffix: config.key_suffix.clone(),
        }
    }

    /// Storage key for the snapshot of `date` (`DD.MM.YYYY`)
    pub fn snapshot_key(&self, date: &str) -> String {
        format!("{}{}{}", self.key_prefix, date, self.key_suffix)
    }

    /// Serializes and stores the day's records
    ///
    /// The payload is pretty-printed UTF-8 JSON with non-ASCII characters
    /// kept as-is. If the day already has a snapshot, nothing is written.
    pub fn publish(&self, date: &str, records: &[Record]) -> Result<PublishOutcome, GazetteError> {
        let key = self.snapshot_key(date);

        if self.store.exists(&key)? {
            tracing::info!("Snapshot {} already exists, leaving it untouched", key);
            return Ok(PublishOutcome::AlreadyPublished { key });
        }

        let payload = serde_json::to_vec_pretty(records)?;

        match self.store.put(&key, &payload) {
            Ok(()) => {}
            Err(StorageError::AlreadyExists(_)) => {
                return Ok(PublishOutcome::AlreadyPublished { key });
            }
            Err(e) => return Err(e.into()),
        }

        let outcome = PublishOutcome::Written {
            key,
            records: records.len(),
            bytes: payload.len(),
            checksum: checksum(&payload),
        };
        tracing::info!("Published {:?}", outcome);
        Ok(outcome)
    }

    /// Returns the bytes of the most recently written snapshot
    ///
    /// Recency is the storage timestamp, not the date inside the key. Only
    /// keys with the configured prefix and suffix are considered.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(bytes))` - The stored payload, unmodified
    /// * `Ok(None)` - No snapshot has been written yet
    /// * `Err(StorageError)` - The backend failed; never reported as `None`
    pub fn get_latest(&self) -> StorageResult<Option<Vec<u8>>> {
        let snapshots = self.store.list()?;

        let latest = newest(
            snapshots
                .iter()
                .filter(|meta| self.is_snapshot_key(&meta.key)),
        );

        match latest {
            Some(meta) => {
                tracing::debug!("Latest snapshot is {} ({})", meta.key, meta.written_at);
                self.store.get(&meta.key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn is_snapshot_key(&self, key: &str) -> bool {
        key.starts_with(&self.key_prefix) && key.ends_with(&self.key_suffix)
    }
}

/// Picks the entry with the latest timestamp; ties go to the greater key
fn newest<'a>(snapshots: impl Iterator<Item = &'a SnapshotMeta>) -> Option<&'a SnapshotMeta> {
    snapshots.max_by(|a, b| {
        a.written_at
            .cmp(&b.written_at)
            .then_with(|| a.key.cmp(&b.key))
    })
}
