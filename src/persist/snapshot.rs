//! Snapshot Persister Module
//!
//! Best-effort serialization of selected cache entries to an external byte
//! store, and freshness-checked restore on startup. Persistence failures
//! are logged and swallowed; a missing or malformed blob restores nothing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::{current_timestamp_ms, CacheStore};
use crate::error::{CacheError, Result};
use crate::persist::storage::SnapshotStorage;

/// Fallback freshness window for records persisted without a TTL.
pub const DEFAULT_RESTORE_MAX_AGE: Duration = Duration::from_secs(30 * 60);

// == Snapshot Filter ==
/// Predicate selecting which keys are eligible for persistence.
pub type SnapshotFilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Builds a filter that admits keys under the given logical namespaces,
/// where a namespaced key has the form `<namespace>:<rest>`.
pub fn namespace_filter(namespaces: &[&str]) -> SnapshotFilter {
    let prefixes: Vec<String> = namespaces.iter().map(|ns| format!("{ns}:")).collect();
    Arc::new(move |key| prefixes.iter().any(|prefix| key.starts_with(prefix)))
}

// == Snapshot Record ==
/// One persisted entry.
///
/// `stale_time` is the entry's TTL in milliseconds; records saved by older
/// writers may lack it, in which case restore falls back to
/// [`DEFAULT_RESTORE_MAX_AGE`].
#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotRecord<V> {
    /// The persisted value
    pub value: V,
    /// Insertion or last-refresh timestamp (epoch milliseconds)
    pub data_updated_at: u64,
    /// TTL in milliseconds, if known
    pub stale_time: Option<u64>,
}

// == Snapshot Persister ==
/// Saves a filtered subset of a store and restores it on startup.
///
/// The whole snapshot is one serialized map from key to record, stored
/// under a fixed identifier and overwritten wholesale on every save. One
/// writer per identifier is assumed.
#[derive(Clone)]
pub struct SnapshotPersister {
    storage: Arc<dyn SnapshotStorage>,
    storage_id: String,
    filter: SnapshotFilter,
    restore_max_age: Duration,
}

impl SnapshotPersister {
    // == Constructor ==
    /// Creates a persister writing under `storage_id`.
    ///
    /// # Arguments
    /// * `storage` - Backing byte store for the snapshot blob
    /// * `storage_id` - Fixed identifier the blob is stored under
    /// * `filter` - Selects which keys are persisted
    pub fn new(
        storage: Arc<dyn SnapshotStorage>,
        storage_id: impl Into<String>,
        filter: SnapshotFilter,
    ) -> Self {
        Self {
            storage,
            storage_id: storage_id.into(),
            filter,
            restore_max_age: DEFAULT_RESTORE_MAX_AGE,
        }
    }

    /// Overrides the freshness window used for records without a TTL.
    pub fn with_restore_max_age(mut self, max_age: Duration) -> Self {
        self.restore_max_age = max_age;
        self
    }

    // == Save ==
    /// Persists every filtered entry, best-effort.
    ///
    /// Values that fail to serialize are skipped individually; a storage
    /// write failure drops the whole save. Neither is surfaced to the
    /// caller beyond a log line.
    pub fn save<V: Clone + Serialize>(&self, store: &CacheStore<V>) {
        if let Err(err) = self.try_save(store) {
            warn!(
                storage_id = %self.storage_id,
                error = %err,
                "snapshot save failed"
            );
        }
    }

    fn try_save<V: Clone + Serialize>(&self, store: &CacheStore<V>) -> Result<()> {
        let mut records: HashMap<&str, SnapshotRecord<serde_json::Value>> = HashMap::new();

        for (key, entry) in store.snapshot_iter() {
            if !(self.filter)(key) {
                continue;
            }
            match serde_json::to_value(&entry.value) {
                Ok(value) => {
                    records.insert(
                        key,
                        SnapshotRecord {
                            value,
                            data_updated_at: entry.created_at,
                            stale_time: Some(entry.ttl_ms),
                        },
                    );
                }
                Err(err) => {
                    debug!(key = %key, error = %err, "skipping unserializable entry");
                }
            }
        }

        let blob = serde_json::to_vec(&records).map_err(CacheError::SnapshotEncode)?;
        self.storage.write(&self.storage_id, &blob)?;

        debug!(
            storage_id = %self.storage_id,
            entries = records.len(),
            "snapshot saved"
        );
        Ok(())
    }

    // == Restore ==
    /// Re-inserts persisted records that are still within their freshness
    /// window, bypassing normal eviction (bulk load).
    ///
    /// A record is kept iff `now - data_updated_at < stale_time`, falling
    /// back to the restore max-age when the original TTL is absent. Stale
    /// records are discarded silently; a missing, empty or malformed blob
    /// restores nothing.
    ///
    /// Returns the number of entries restored.
    pub fn restore<V: Clone + DeserializeOwned>(&self, store: &mut CacheStore<V>) -> usize {
        match self.try_restore(store) {
            Ok(restored) => {
                info!(
                    storage_id = %self.storage_id,
                    restored,
                    "snapshot restore complete"
                );
                restored
            }
            Err(err) => {
                warn!(
                    storage_id = %self.storage_id,
                    error = %err,
                    "snapshot restore skipped"
                );
                0
            }
        }
    }

    fn try_restore<V: Clone + DeserializeOwned>(&self, store: &mut CacheStore<V>) -> Result<usize> {
        let blob = match self.storage.read(&self.storage_id)? {
            Some(blob) if !blob.is_empty() => blob,
            _ => {
                debug!(storage_id = %self.storage_id, "no snapshot to restore");
                return Ok(0);
            }
        };

        let records: HashMap<String, SnapshotRecord<serde_json::Value>> =
            serde_json::from_slice(&blob).map_err(CacheError::SnapshotDecode)?;

        let now = current_timestamp_ms();
        let mut restored = 0;

        for (key, record) in records {
            let ttl_ms = record
                .stale_time
                .unwrap_or(self.restore_max_age.as_millis() as u64);
            let age = now.saturating_sub(record.data_updated_at);
            if age >= ttl_ms {
                continue;
            }
            match serde_json::from_value(record.value) {
                Ok(value) => {
                    store.restore_entry(key, value, record.data_updated_at, ttl_ms);
                    restored += 1;
                }
                Err(err) => {
                    debug!(key = %key, error = %err, "skipping undecodable record");
                }
            }
        }

        Ok(restored)
    }
}
