//! Configuration Module
//!
//! Handles cache engine configuration with environment-variable overrides.

use std::env;
use std::time::Duration;

/// Cache engine configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults. Facades override `capacity` and `default_ttl` for their domain.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// TTL applied to entries stored without an explicit one
    pub default_ttl: Duration,
    /// Interval between background expiry sweeps
    pub sweep_interval: Duration,
    /// Interval between background snapshot saves
    pub snapshot_interval: Duration,
}

impl CacheConfig {
    /// Creates a new config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 100)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `CACHE_SWEEP_INTERVAL_SECS` - Expiry sweep frequency in seconds (default: 60)
    /// - `CACHE_SNAPSHOT_INTERVAL_SECS` - Snapshot save frequency in seconds (default: 120)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.capacity),
            default_ttl: env::var("CACHE_DEFAULT_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.default_ttl),
            sweep_interval: env::var("CACHE_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
            snapshot_interval: env::var("CACHE_SNAPSHOT_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.snapshot_interval),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            default_ttl: Duration::from_secs(300),
            sweep_interval: Duration::from_secs(60),
            snapshot_interval: Duration::from_secs(120),
        }
    }
}
