//! Background Tasks Module
//!
//! Periodic maintenance that runs independently of foreground calls.
//!
//! # Tasks
//! - Expiry sweep: removes expired cache entries at configured intervals
//! - Snapshot save: persists the filtered cache contents at configured intervals

mod snapshot;
mod sweep;

pub use snapshot::spawn_snapshot_task;
pub use sweep::spawn_sweep_task;
