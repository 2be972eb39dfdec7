//! Snapshot Save Task
//!
//! Background task that periodically persists the filtered cache contents.
//! Saving is best-effort: a failed save is logged by the persister and the
//! task simply tries again next interval.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::info;

use crate::handle::Cache;
use crate::persist::SnapshotPersister;

/// Spawns a background task that periodically saves a cache snapshot.
///
/// Hosts should additionally call [`Cache::save_snapshot`] from their own
/// teardown or suspension hooks; this task only covers the steady state.
///
/// # Arguments
/// * `cache` - Shared cache handle
/// * `persister` - Configured persister (storage, identifier, filter)
/// * `interval` - Time between saves
///
/// # Returns
/// A JoinHandle for the spawned task; abort it during shutdown.
pub fn spawn_snapshot_task<V>(
    cache: Cache<V>,
    persister: SnapshotPersister,
    interval: Duration,
) -> JoinHandle<()>
where
    V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs(),
            "starting snapshot save task"
        );

        loop {
            tokio::time::sleep(interval).await;
            cache.save_snapshot(&persister).await;
        }
    })
}
