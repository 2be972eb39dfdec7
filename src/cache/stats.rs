//! Cache Statistics Module
//!
//! Tracks cache performance counters and builds the diagnostic snapshot
//! returned by `CacheStore::stats`.

use serde::Serialize;

// == Cache Metrics ==
/// Running performance counters owned by the store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheMetrics {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key absent or expired)
    pub misses: u64,
    /// Number of entries evicted by the LRU policy
    pub evictions: u64,
    /// Number of entries removed because their TTL elapsed
    pub expirations: u64,
}

impl CacheMetrics {
    // == Constructor ==
    /// Creates metrics with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Record Expiration ==
    /// Increments the expiration counter.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }
}

// == Cache Stats ==
/// Read-only diagnostic snapshot of a store.
///
/// `expired_count` counts entries that are stale but not yet swept;
/// `total_size_bytes` is an approximation built by serializing every live
/// value, skipping any that cannot be serialized.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Current number of live entries
    pub size: usize,
    /// Maximum number of entries
    pub capacity: usize,
    /// Entries already past their TTL but not yet removed
    pub expired_count: usize,
    /// Approximate serialized size of all live values, in bytes
    pub total_size_bytes: usize,
    /// Least recently used key, if any
    pub oldest_key: Option<String>,
    /// Most recently used key, if any
    pub newest_key: Option<String>,
    /// Performance counters since the store was created
    #[serde(flatten)]
    pub metrics: CacheMetrics,
}
