//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries, so
//! memory is reclaimed even while the cache only serves reads (lazy expiry
//! alone never cleans up keys nobody asks for again).

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::handle::Cache;

/// Spawns a background task that periodically sweeps expired entries.
///
/// The task loops forever, sleeping for `interval` between sweeps, and
/// takes the store's write lock only for the duration of each sweep.
///
/// # Arguments
/// * `cache` - Shared cache handle
/// * `interval` - Time between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task; abort it during shutdown.
///
/// # Example
/// ```ignore
/// let cache: Cache<String> = Cache::new(100, Duration::from_secs(300));
/// let sweep_handle = spawn_sweep_task(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task<V: Clone + Send + Sync + 'static>(
    cache: Cache<V>,
    interval: Duration,
) -> JoinHandle<()> {
    let store = cache.store();

    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "starting expiry sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut store_guard = store.write().await;
                store_guard.sweep_expired()
            };

            if removed > 0 {
                info!(removed, "expiry sweep removed stale entries");
            } else {
                debug!("expiry sweep found no stale entries");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sweep_task_removes_expired_entries() {
        let cache = Cache::new(100, Duration::from_secs(300));

        cache
            .set("expire_soon", "value".to_string(), Some(Duration::from_millis(30)))
            .await;

        let handle = spawn_sweep_task(cache.clone(), Duration::from_millis(50));

        // Wait for the entry to expire and the sweep to run
        tokio::time::sleep(Duration::from_millis(150)).await;

        // Peek so the check itself cannot be the thing that removed it
        assert_eq!(cache.peek("expire_soon").await, None);
        assert_eq!(cache.len().await, 0);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_preserves_valid_entries() {
        let cache = Cache::new(100, Duration::from_secs(300));

        cache
            .set("long_lived", "value".to_string(), Some(Duration::from_secs(3600)))
            .await;

        let handle = spawn_sweep_task(cache.clone(), Duration::from_millis(30));

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(cache.get("long_lived").await, Some("value".to_string()));

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let cache: Cache<String> = Cache::new(100, Duration::from_secs(300));

        let handle = spawn_sweep_task(cache, Duration::from_secs(1));

        handle.abort();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
