//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with access-order tracking,
//! TTL expiration and LRU eviction.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::cache::entry::CacheEntry;
use crate::cache::ledger::AccessLedger;
use crate::cache::stats::{CacheMetrics, CacheStats};
use crate::config::CacheConfig;

// == Cache Store ==
/// Bounded key/value store with TTL expiration and LRU eviction.
///
/// The store and its ledger are kept in bijection: every stored key appears
/// exactly once in the access order, and vice versa. The size never exceeds
/// `capacity` after a mutating operation completes.
///
/// Note that `get` (and therefore `has`) is not a pure read: it refreshes
/// the key's recency and removes the entry if it turns out to be expired.
/// Use [`peek`](CacheStore::peek) for a side-effect-free lookup.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Access-order ledger, oldest-accessed at the head
    ledger: AccessLedger,
    /// Performance counters
    metrics: CacheMetrics,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL applied when a caller does not specify one
    default_ttl: Duration,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new store with the given capacity and default TTL.
    ///
    /// A capacity of zero is clamped to one: `set` always stores the entry
    /// it was given, so the smallest bound the store can honor is a single
    /// entry.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the store can hold
    /// * `default_ttl` - TTL for entries stored without an explicit one
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ledger: AccessLedger::new(),
            metrics: CacheMetrics::new(),
            capacity: capacity.max(1),
            default_ttl,
        }
    }

    /// Creates a store from a [`CacheConfig`].
    pub fn with_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity, config.default_ttl)
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL override.
    ///
    /// If the key already exists, the value is overwritten and its TTL
    /// window restarts. Before inserting, expired entries are swept and the
    /// least recently used entries are evicted until the store is under
    /// capacity, so unrelated entries may disappear as a side effect.
    ///
    /// Returns the stored value unchanged, for chained-call ergonomics.
    ///
    /// # Arguments
    /// * `key` - The key to store under
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL (uses the store default if None)
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) -> V {
        let key = key.into();

        self.sweep_expired();

        while !self.entries.is_empty() && self.entries.len() >= self.capacity {
            match self.ledger.evict_oldest() {
                Some(evicted) => {
                    self.entries.remove(&evicted);
                    self.metrics.record_eviction();
                    debug!(key = %evicted, "evicted least recently used entry");
                }
                None => break,
            }
        }

        let entry = CacheEntry::new(value.clone(), ttl.unwrap_or(self.default_ttl));
        self.entries.insert(key.clone(), entry);
        self.ledger.touch(&key);

        value
    }

    // == Get ==
    /// Retrieves a value by key, refreshing its recency.
    ///
    /// Returns None for absent keys. An entry found expired is removed from
    /// both the store and the ledger before None is returned (lazy
    /// expiration), so the lookup itself mutates eviction order and size.
    pub fn get(&mut self, key: &str) -> Option<V> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                self.ledger.remove(key);
                self.metrics.record_expiration();
                self.metrics.record_miss();
                None
            }
            Some(entry) => {
                let value = entry.value.clone();
                self.metrics.record_hit();
                self.ledger.touch(key);
                Some(value)
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Looks up a value without any side effect.
    ///
    /// Does not refresh recency, does not remove stale entries and does not
    /// count as a hit or miss. Returns None for absent or expired entries.
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| &entry.value)
    }

    // == Has ==
    /// Checks whether a live entry exists for the key.
    ///
    /// Defined in terms of `get`, so it shares its lazy-expiry side effect.
    pub fn has(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    // == Remove ==
    /// Deletes an entry by key.
    ///
    /// Returns whether a deletion occurred; absent keys are a no-op.
    pub fn remove(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.ledger.remove(key);
            true
        } else {
            false
        }
    }

    // == Clear ==
    /// Empties the store and the ledger unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.ledger.clear();
    }

    // == Sweep Expired ==
    /// Removes every expired entry from the store and the ledger.
    ///
    /// Runs on each `set` and from the periodic sweep task, so memory is
    /// reclaimed even when nothing touches the stale keys again.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
            self.ledger.remove(&key);
            self.metrics.record_expiration();
        }

        count
    }

    // == Restore Entry ==
    /// Re-inserts a persisted entry with its original timestamps.
    ///
    /// Bulk-load path used by the snapshot persister: bypasses the sweep
    /// and eviction that `set` performs, but still keeps the ledger in
    /// bijection with the entry map. The store may transiently exceed its
    /// capacity until the next `set`.
    pub fn restore_entry(&mut self, key: impl Into<String>, value: V, created_at: u64, ttl_ms: u64) {
        let key = key.into();
        self.entries
            .insert(key.clone(), CacheEntry::restored(value, created_at, ttl_ms));
        self.ledger.touch(&key);
    }

    // == Snapshot Iteration ==
    /// Read-only iteration over all entries, for snapshot persistence.
    pub fn snapshot_iter(&self) -> impl Iterator<Item = (&str, &CacheEntry<V>)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    // == Accessors ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the configured default TTL.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns the running performance counters.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }
}

impl<V: Clone + Serialize> CacheStore<V> {
    // == Stats ==
    /// Builds a read-only diagnostic snapshot of the store.
    ///
    /// `total_size_bytes` is approximated by serializing every live value;
    /// values that fail to serialize are skipped, never an error.
    pub fn stats(&self) -> CacheStats {
        let expired_count = self
            .entries
            .values()
            .filter(|entry| entry.is_expired())
            .count();

        let total_size_bytes = self
            .entries
            .iter()
            .filter_map(|(key, entry)| match serde_json::to_vec(&entry.value) {
                Ok(bytes) => Some(bytes.len()),
                Err(err) => {
                    debug!(key = %key, error = %err, "skipping unserializable value in size estimate");
                    None
                }
            })
            .sum();

        CacheStats {
            size: self.entries.len(),
            capacity: self.capacity,
            expired_count,
            total_size_bytes,
            oldest_key: self.ledger.peek_oldest().map(String::from),
            newest_key: self.ledger.peek_newest().map(String::from),
            metrics: self.metrics.clone(),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const TTL: Duration = Duration::from_secs(300);

    #[test]
    fn test_store_new() {
        let store: CacheStore<String> = CacheStore::new(100, TTL);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new(100, TTL);

        store.set("key1", "value1".to_string(), None);
        let value = store.get("key1");

        assert_eq!(value, Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_set_returns_stored_value() {
        let mut store = CacheStore::new(100, TTL);

        let stored = store.set("key1", 42u32, None);
        assert_eq!(stored, 42);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store: CacheStore<String> = CacheStore::new(100, TTL);

        assert_eq!(store.get("nonexistent"), None);
        assert_eq!(store.metrics().misses, 1);
    }

    #[test]
    fn test_store_remove() {
        let mut store = CacheStore::new(100, TTL);

        store.set("key1", "value1".to_string(), None);
        assert!(store.remove("key1"));

        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
    }

    #[test]
    fn test_store_remove_nonexistent() {
        let mut store: CacheStore<String> = CacheStore::new(100, TTL);
        assert!(!store.remove("nonexistent"));
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new(100, TTL);

        store.set("key1", "value1".to_string(), None);
        store.set("key1", "value2".to_string(), None);

        assert_eq!(store.get("key1"), Some("value2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(100, TTL);

        store.set("key1", "value1".to_string(), Some(Duration::from_millis(50)));

        assert!(store.has("key1"));

        sleep(Duration::from_millis(80));

        // Lazy expiry: the lookup itself removes the stale entry
        assert_eq!(store.get("key1"), None);
        assert_eq!(store.len(), 0);
        assert_eq!(store.metrics().expirations, 1);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = CacheStore::new(3, TTL);

        store.set("key1", 1, None);
        store.set("key2", 2, None);
        store.set("key3", 3, None);

        // Store is full; adding key4 evicts key1 (oldest)
        store.set("key4", 4, None);

        assert_eq!(store.len(), 3);
        assert!(!store.has("key1"));
        assert!(store.has("key2"));
        assert!(store.has("key3"));
        assert!(store.has("key4"));
        assert_eq!(store.metrics().evictions, 1);
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = CacheStore::new(3, TTL);

        store.set("key1", 1, None);
        store.set("key2", 2, None);
        store.set("key3", 3, None);

        // Access key1 to make it most recently used
        store.get("key1");

        // Adding key4 evicts key2 (now oldest)
        store.set("key4", 4, None);

        assert!(store.has("key1"));
        assert!(!store.has("key2"));
    }

    #[test]
    fn test_store_capacity_scenario() {
        // capacity=2: set a, b, c leaves exactly {b, c}
        let mut store = CacheStore::new(2, Duration::from_secs(1));

        store.set("a", 1, None);
        store.set("b", 2, None);
        store.set("c", 3, None);

        assert!(!store.has("a"));
        assert!(store.has("b"));
        assert!(store.has("c"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_zero_capacity_clamps_to_one() {
        let mut store = CacheStore::new(0, TTL);
        assert_eq!(store.capacity(), 1);

        store.set("a", 1, None);
        assert!(store.len() <= store.capacity());
        assert!(store.has("a"));

        // The single slot still obeys LRU replacement
        store.set("b", 2, None);
        assert!(store.len() <= store.capacity());
        assert!(!store.has("a"));
        assert!(store.has("b"));
    }

    #[test]
    fn test_store_peek_has_no_side_effects() {
        let mut store = CacheStore::new(2, TTL);

        store.set("key1", 1, None);
        store.set("key2", 2, None);

        // Peeking key1 must not refresh it
        assert_eq!(store.peek("key1"), Some(&1));

        // key1 is still the oldest, so it is the one evicted
        store.set("key3", 3, None);
        assert!(!store.has("key1"));
        assert!(store.has("key2"));
    }

    #[test]
    fn test_store_peek_expired_leaves_entry_in_place() {
        let mut store = CacheStore::new(100, TTL);

        store.set("key1", 1, Some(Duration::from_millis(20)));
        sleep(Duration::from_millis(50));

        // Peek reports absent but does not remove
        assert_eq!(store.peek("key1"), None);
        assert_eq!(store.len(), 1);

        // get performs the actual lazy removal
        assert_eq!(store.get("key1"), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_store_clear() {
        let mut store = CacheStore::new(100, TTL);

        store.set("key1", 1, None);
        store.set("key2", 2, None);
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
    }

    #[test]
    fn test_store_sweep_expired() {
        let mut store = CacheStore::new(100, TTL);

        store.set("short", 1, Some(Duration::from_millis(20)));
        store.set("long", 2, Some(Duration::from_secs(10)));

        sleep(Duration::from_millis(50));

        let removed = store.sweep_expired();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.has("long"));
    }

    #[test]
    fn test_store_set_sweeps_before_evicting() {
        let mut store = CacheStore::new(2, TTL);

        store.set("stale", 1, Some(Duration::from_millis(20)));
        store.set("fresh", 2, None);

        sleep(Duration::from_millis(50));

        // The sweep inside set removes "stale", so "fresh" survives even
        // though the store was nominally full
        store.set("new", 3, None);

        assert!(store.has("fresh"));
        assert!(store.has("new"));
        assert_eq!(store.metrics().evictions, 0);
    }

    #[test]
    fn test_store_restore_entry_bypasses_eviction() {
        let mut store = CacheStore::new(2, TTL);

        store.set("a", 1, None);
        store.set("b", 2, None);

        let now = crate::cache::entry::current_timestamp_ms();
        store.restore_entry("c", 3, now, 60_000);

        // Bulk load may transiently exceed capacity
        assert_eq!(store.len(), 3);
        assert!(store.has("c"));

        // The next set brings the store back under capacity
        store.set("d", 4, None);
        assert!(store.len() <= 2);
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new(100, TTL);

        store.set("key1", "value1".to_string(), None);
        store.set("key2", "value2".to_string(), None);
        store.get("key1"); // hit
        store.get("nonexistent"); // miss

        let stats = store.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.capacity, 100);
        assert_eq!(stats.expired_count, 0);
        assert!(stats.total_size_bytes > 0);
        assert_eq!(stats.oldest_key, Some("key2".to_string()));
        assert_eq!(stats.newest_key, Some("key1".to_string()));
        assert_eq!(stats.metrics.hits, 1);
        assert_eq!(stats.metrics.misses, 1);
    }

    // Value type whose serialized form only exists for some variants, to
    // exercise the skip branch of the stats size estimate
    #[derive(Clone)]
    enum Artifact {
        Text(String),
        Opaque,
    }

    impl serde::Serialize for Artifact {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Artifact::Text(text) => serializer.serialize_str(text),
                Artifact::Opaque => Err(serde::ser::Error::custom(
                    "opaque artifact has no serialized form",
                )),
            }
        }
    }

    #[test]
    fn test_store_stats_skips_unserializable_values() {
        let mut store = CacheStore::new(100, TTL);

        store.set("doc", Artifact::Text("hello".to_string()), None);
        store.set("raw", Artifact::Opaque, None);

        // The stats call still succeeds; only the serializable value
        // contributes to the size estimate
        let stats = store.stats();
        assert_eq!(stats.size, 2);

        let text_bytes = serde_json::to_vec("hello").unwrap().len();
        assert_eq!(stats.total_size_bytes, text_bytes);
    }

    #[test]
    fn test_store_stats_counts_unswept_expired() {
        let mut store = CacheStore::new(100, TTL);

        store.set("stale", 1, Some(Duration::from_millis(20)));
        sleep(Duration::from_millis(50));

        let stats = store.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.expired_count, 1);
    }
}
