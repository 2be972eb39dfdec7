//! Export Result Cache Facade
//!
//! Memoizes export runs (e.g. rendered PDF bytes) keyed by a digest of the
//! source content plus the output format, so identical inputs never trigger
//! a second render. Export output goes stale quickly next to templates,
//! hence the short TTL.

use std::future::Future;
use std::time::Duration;

use sha2::{Digest, Sha256};

use crate::handle::Cache;

/// Maximum number of export results kept in memory; exports are large, so
/// the facade holds far fewer entries than the engine default.
pub const EXPORT_CACHE_CAPACITY: usize = 20;

/// Freshness window for cached export results.
pub const EXPORT_TTL: Duration = Duration::from_secs(120);

/// Key namespace for export entries. Not on the snapshot allow-list:
/// export bytes are cheap to re-derive relative to their size on disk.
pub const EXPORT_NAMESPACE: &str = "exports";

// == Export Result Cache ==
/// Domain facade over the generic engine for export artifacts.
#[derive(Clone)]
pub struct ExportResultCache {
    cache: Cache<Vec<u8>>,
}

impl ExportResultCache {
    // == Constructor ==
    /// Creates an export cache with the domain's fixed capacity and TTL.
    pub fn new() -> Self {
        Self {
            cache: Cache::new(EXPORT_CACHE_CAPACITY, EXPORT_TTL),
        }
    }

    // == Key Derivation ==
    /// Derives the cache key for a source document and output format.
    ///
    /// The content digest makes the key deterministic in the content
    /// itself: identical input and format always map to the same key, and
    /// any content change maps elsewhere.
    pub fn export_key(content: &str, format: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        let digest = hasher.finalize();
        format!("{EXPORT_NAMESPACE}:{format}:{digest:x}")
    }

    // == Operations ==
    /// Returns the cached export result, if fresh.
    pub async fn get(&self, content: &str, format: &str) -> Option<Vec<u8>> {
        self.cache.get(&Self::export_key(content, format)).await
    }

    /// Returns the cached export result, rendering and caching on miss.
    ///
    /// Render failures are propagated and nothing is cached.
    pub async fn get_or_render<F, Fut, E>(
        &self,
        content: &str,
        format: &str,
        render: F,
    ) -> Result<Vec<u8>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<u8>, E>>,
    {
        self.cache
            .preload(&Self::export_key(content, format), render, None)
            .await
    }

    /// Drops the cached result for one content/format pair.
    pub async fn invalidate(&self, content: &str, format: &str) -> bool {
        self.cache.remove(&Self::export_key(content, format)).await
    }

    /// The underlying generic cache, for diagnostics.
    pub fn inner(&self) -> &Cache<Vec<u8>> {
        &self.cache
    }
}

impl Default for ExportResultCache {
    fn default() -> Self {
        Self::new()
    }
}
