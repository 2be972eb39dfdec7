//! Cache Module
//!
//! The generic cache engine: bounded storage with TTL expiration and LRU
//! eviction.

mod entry;
mod ledger;
mod stats;
mod store;


// Re-export public types; the access-order ledger stays internal to the
// store and has no caller-facing surface.
pub use entry::{current_timestamp_ms, CacheEntry};
pub use stats::{CacheMetrics, CacheStats};
pub use store::CacheStore;
