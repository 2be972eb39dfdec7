//! Shared Cache Handle Module
//!
//! Wraps a [`CacheStore`] in `Arc<RwLock<..>>` so foreground callers and the
//! background maintenance tasks share one store. Handles are created
//! explicitly by whichever component owns the cache lifecycle and passed to
//! collaborators; there is no ambient global instance.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::persist::SnapshotPersister;

// == Cache Handle ==
/// Cloneable shared handle to a cache store.
///
/// Every operation takes the lock for the duration of that operation only,
/// so `set`/`get`/`remove` are atomic with respect to each other. `preload`
/// releases the lock while awaiting its producer; see its documentation for
/// the resulting race.
#[derive(Debug)]
pub struct Cache<V> {
    store: Arc<RwLock<CacheStore<V>>>,
}

impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<V: Clone + Send + Sync + 'static> Cache<V> {
    // == Constructors ==
    /// Creates a cache with the given capacity and default TTL.
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(capacity, default_ttl))),
        }
    }

    /// Creates a cache from a [`CacheConfig`].
    pub fn with_config(config: &CacheConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::with_config(config))),
        }
    }

    /// Shared reference to the underlying store, for background tasks.
    pub(crate) fn store(&self) -> Arc<RwLock<CacheStore<V>>> {
        Arc::clone(&self.store)
    }

    // == Core Operations ==
    /// Stores a key-value pair, returning the stored value unchanged.
    ///
    /// See [`CacheStore::set`] for the sweep and eviction side effects.
    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) -> V {
        self.store.write().await.set(key, value, ttl)
    }

    /// Retrieves a value by key, refreshing its recency.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.store.write().await.get(key)
    }

    /// Looks up a value without side effects (no recency refresh, no
    /// lazy-expiry removal).
    pub async fn peek(&self, key: &str) -> Option<V> {
        self.store.read().await.peek(key).cloned()
    }

    /// Checks whether a live entry exists for the key.
    pub async fn has(&self, key: &str) -> bool {
        self.store.write().await.has(key)
    }

    /// Deletes an entry by key, returning whether a deletion occurred.
    pub async fn remove(&self, key: &str) -> bool {
        self.store.write().await.remove(key)
    }

    /// Empties the cache unconditionally.
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    /// Returns the current number of entries.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Returns true if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Removes every expired entry, returning how many were removed.
    pub async fn sweep_expired(&self) -> usize {
        self.store.write().await.sweep_expired()
    }

    // == Preload ==
    /// Returns the cached value for `key`, computing and storing it on miss.
    ///
    /// On a hit the producer is never invoked. On a miss the producer runs,
    /// its failure is propagated verbatim and nothing is cached; on success
    /// the value is stored via `set` and returned.
    ///
    /// The lock is released while the producer runs, so two concurrent
    /// `preload` calls for the same cold key both observe a miss and both
    /// invoke their producer; the second result to arrive overwrites the
    /// first. Callers needing single-flight deduplication must layer their
    /// own per-key in-flight guard on top.
    pub async fn preload<F, Fut, E>(
        &self,
        key: &str,
        producer: F,
        ttl: Option<Duration>,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
    {
        if let Some(value) = self.get(key).await {
            return Ok(value);
        }

        let value = producer().await?;
        Ok(self.set(key, value, ttl).await)
    }
}

impl<V: Clone + Serialize + Send + Sync + 'static> Cache<V> {
    // == Stats ==
    /// Builds a read-only diagnostic snapshot.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }
}

impl<V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static> Cache<V> {
    // == Snapshot Hooks ==
    /// Saves a filtered snapshot now, e.g. on teardown or before the host
    /// application is suspended. Best-effort: failures are logged.
    pub async fn save_snapshot(&self, persister: &SnapshotPersister) {
        persister.save(&*self.store.read().await);
    }

    /// Restores persisted entries on startup, returning how many records
    /// were still fresh enough to re-insert.
    pub async fn restore_snapshot(&self, persister: &SnapshotPersister) -> usize {
        persister.restore(&mut *self.store.write().await)
    }
}
