//! Template Cache Facade
//!
//! Memoizes fetched document templates. Fixes the capacity and TTL for the
//! template domain and derives keys from template names; the generic
//! engine's eviction and expiry policy is untouched.

use std::future::Future;
use std::time::Duration;

use crate::handle::Cache;

/// Maximum number of templates kept in memory.
pub const TEMPLATE_CACHE_CAPACITY: usize = 50;

/// Templates change rarely, so they stay fresh longer than the engine
/// default.
pub const TEMPLATE_TTL: Duration = Duration::from_secs(600);

/// Key namespace for template entries. Hosts that persist snapshots
/// typically allow-list this namespace so templates survive restarts.
pub const TEMPLATE_NAMESPACE: &str = "templates";

// == Template Cache ==
/// Domain facade over the generic engine for fetched templates.
#[derive(Clone)]
pub struct TemplateCache {
    cache: Cache<String>,
}

impl TemplateCache {
    // == Constructor ==
    /// Creates a template cache with the domain's fixed capacity and TTL.
    pub fn new() -> Self {
        Self {
            cache: Cache::new(TEMPLATE_CACHE_CAPACITY, TEMPLATE_TTL),
        }
    }

    // == Key Derivation ==
    /// Derives the cache key for a template name.
    ///
    /// Deterministic: the same name always maps to the same key.
    pub fn template_key(name: &str) -> String {
        format!("{TEMPLATE_NAMESPACE}:{name}")
    }

    // == Operations ==
    /// Returns the cached template body, if fresh.
    pub async fn get(&self, name: &str) -> Option<String> {
        self.cache.get(&Self::template_key(name)).await
    }

    /// Stores a template body, returning it unchanged.
    pub async fn store(&self, name: &str, body: String) -> String {
        self.cache.set(Self::template_key(name), body, None).await
    }

    /// Returns the cached template, fetching and caching it on miss.
    ///
    /// Fetch failures are propagated and nothing is cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, name: &str, fetch: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        self.cache
            .preload(&Self::template_key(name), fetch, None)
            .await
    }

    /// Drops a cached template, returning whether one was present.
    pub async fn invalidate(&self, name: &str) -> bool {
        self.cache.remove(&Self::template_key(name)).await
    }

    /// The underlying generic cache, for snapshot wiring and diagnostics.
    pub fn inner(&self) -> &Cache<String> {
        &self.cache
    }
}

impl Default for TemplateCache {
    fn default() -> Self {
        Self::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_template_key_is_deterministic_and_namespaced() {
        assert_eq!(TemplateCache::template_key("invoice"), "templates:invoice");
        assert_eq!(
            TemplateCache::template_key("invoice"),
            TemplateCache::template_key("invoice")
        );
    }

    #[tokio::test]
    async fn test_store_and_get() {
        let templates = TemplateCache::new();

        templates.store("invoice", "# Invoice".to_string()).await;

        assert_eq!(templates.get("invoice").await, Some("# Invoice".to_string()));
        assert_eq!(templates.get("report").await, None);
    }

    #[tokio::test]
    async fn test_get_or_fetch_memoizes() {
        let templates = TemplateCache::new();
        let fetches = AtomicUsize::new(0);

        for _ in 0..3 {
            let body = templates
                .get_or_fetch("invoice", || async {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, std::convert::Infallible>("# Invoice".to_string())
                })
                .await
                .unwrap();
            assert_eq!(body, "# Invoice");
        }

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_or_fetch_propagates_failure() {
        let templates = TemplateCache::new();

        let result = templates
            .get_or_fetch("missing", || async { Err::<String, _>("404") })
            .await;

        assert_eq!(result, Err("404"));
        assert_eq!(templates.get("missing").await, None);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let templates = TemplateCache::new();

        templates.store("invoice", "# Invoice".to_string()).await;

        assert!(templates.invalidate("invoice").await);
        assert!(!templates.invalidate("invoice").await);
        assert_eq!(templates.get("invoice").await, None);
    }
}
