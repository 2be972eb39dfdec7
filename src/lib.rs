//! Artifact Cache - a bounded in-memory cache for derived document artifacts
//!
//! Provides TTL expiration, LRU eviction and best-effort snapshot
//! persistence. The cache memoizes expensive derived values (rendered
//! previews, export results, fetched templates) and is always a strict
//! performance optimization: every failure degrades to a cache miss or a
//! skipped save, never an error the caller must handle.

pub mod cache;
pub mod config;
pub mod error;
pub mod facade;
pub mod handle;
pub mod persist;
pub mod tasks;

pub use cache::{CacheEntry, CacheMetrics, CacheStats, CacheStore};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use facade::{ExportResultCache, TemplateCache};
pub use handle::Cache;
pub use persist::{namespace_filter, FileStorage, MemoryStorage, SnapshotPersister, SnapshotStorage};
pub use tasks::{spawn_snapshot_task, spawn_sweep_task};
