//! Error types for the cache crate
//!
//! Provides unified error handling using thiserror.
//!
//! Only the persistence layer produces these errors, and even there they
//! are logged and swallowed rather than surfaced: the cache is a strict
//! performance optimization, never a correctness dependency. Core store
//! operations are infallible, and `preload` propagates the producer's own
//! error type verbatim.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for snapshot persistence.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Reading or writing the snapshot blob failed
    #[error("snapshot storage I/O failed: {0}")]
    SnapshotIo(#[from] std::io::Error),

    /// A snapshot record could not be serialized
    #[error("snapshot serialization failed: {0}")]
    SnapshotEncode(#[source] serde_json::Error),

    /// The persisted blob could not be parsed
    #[error("snapshot blob is malformed: {0}")]
    SnapshotDecode(#[source] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache crate.
pub type Result<T> = std::result::Result<T, CacheError>;
