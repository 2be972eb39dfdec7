//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// Represents a single cache entry with its value and freshness metadata.
///
/// The value is opaque to the cache: it is never introspected, only cloned
/// back out on a hit.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Insertion or last-refresh timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Time-to-live in milliseconds
    pub ttl_ms: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - Time-to-live for this entry
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            created_at: current_timestamp_ms(),
            ttl_ms: ttl.as_millis() as u64,
        }
    }

    /// Creates an entry with an explicit creation timestamp.
    ///
    /// Used when restoring persisted entries, which keep their original
    /// insertion time so the remaining TTL window carries over.
    pub fn restored(value: V, created_at: u64, ttl_ms: u64) -> Self {
        Self {
            value,
            created_at,
            ttl_ms,
        }
    }

    // == Age ==
    /// Returns milliseconds elapsed since insertion or last refresh.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.created_at)
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once strictly more than
    /// `ttl_ms` milliseconds have elapsed since `created_at`. At exactly
    /// `ttl_ms` elapsed the entry is still fresh.
    pub fn is_expired(&self) -> bool {
        self.age_ms() > self.ttl_ms
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds.
    ///
    /// Useful for diagnostics; returns 0 once the entry has expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.ttl_ms.saturating_sub(self.age_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
