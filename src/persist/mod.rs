//! Persistence Module
//!
//! Best-effort snapshot save/restore for selected cache entries.
//!
//! The cache itself decides nothing about lifecycle: hosts call
//! [`SnapshotPersister::restore`] on startup, run the periodic save task,
//! and call save explicitly on teardown or before suspension.

mod snapshot;
mod storage;

// Re-export public types
pub use snapshot::{
    namespace_filter, SnapshotFilter, SnapshotPersister, SnapshotRecord, DEFAULT_RESTORE_MAX_AGE,
};
pub use storage::{FileStorage, MemoryStorage, SnapshotStorage};
