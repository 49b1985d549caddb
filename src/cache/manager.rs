//! Get-or-fetch orchestration over the TTL store.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use crate::Result;
use crate::telemetry;

use super::{CacheKey, ResourceKind, TtlCache};

/// Default TTL for cached controller state: five minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Coordinates cache reads with fetch callbacks.
///
/// On a miss the fetch callback runs exactly once and its result is
/// cached under the resolved TTL (explicit, else the manager default);
/// fetch failures propagate and cache nothing. There is no single-flight
/// guarantee: two concurrent callers racing on the same uncached key will
/// both fetch, and the last write wins — acceptable because the
/// controller, not this cache, is the source of truth.
///
/// Cache lifetime is the manager's lifetime; construct one per batch run
/// and drop it at the end. Nothing here is global.
pub struct CacheManager<T> {
    store: TtlCache<T>,
}

impl<T: Clone> CacheManager<T> {
    /// Create a manager with the default five-minute TTL.
    pub fn new() -> Self {
        Self::with_default_ttl(Some(DEFAULT_TTL))
    }

    /// Create a manager with a custom default TTL. `None` means entries
    /// written without an explicit TTL never expire.
    pub fn with_default_ttl(default_ttl: Option<Duration>) -> Self {
        Self {
            store: TtlCache::new(default_ttl),
        }
    }

    /// Return the cached value for `key`, or run `fetch` once and cache
    /// its result.
    ///
    /// A fetch that resolves to `None` (resource absent on the
    /// controller) is returned but not cached, so the next lookup asks
    /// again.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &CacheKey,
        fetch: F,
        ttl: Option<Duration>,
    ) -> Result<Option<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        if let Some(cached) = self.store.get(key) {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "resource" => key.kind().as_str())
                .increment(1);
            return Ok(Some(cached));
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "resource" => key.kind().as_str())
            .increment(1);

        let value = fetch().await?;
        if let Some(ref data) = value {
            self.store.set(key.clone(), data.clone(), ttl);
        }
        Ok(value)
    }

    /// Return the complete cached listing for `(fabric, kind)`, or run
    /// `fetch` once, cache the full mapping, and return it.
    ///
    /// Only listings written whole (via a prior bulk fetch) count as
    /// cached; partial content from single-entry write-throughs triggers
    /// a fresh fetch.
    pub async fn get_bulk_or_fetch<F, Fut>(
        &self,
        fabric: &str,
        kind: ResourceKind,
        fetch: F,
        ttl: Option<Duration>,
    ) -> Result<HashMap<String, T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<HashMap<String, T>>>,
    {
        if let Some(cached) = self.store.get_bulk(fabric, kind) {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "resource" => kind.as_str())
                .increment(1);
            return Ok(cached);
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "resource" => kind.as_str()).increment(1);

        let all = fetch().await?;
        self.store.set_bulk(fabric, kind, all.clone(), ttl);
        Ok(all)
    }

    /// Write-through after a successful mutation.
    pub fn update_cache(&self, key: CacheKey, value: T, ttl: Option<Duration>) {
        self.store.set(key, value, ttl);
    }

    /// Remove an entry after a successful delete.
    pub fn remove_from_cache(&self, key: &CacheKey) {
        self.store.delete(key);
    }

    /// Drop every entry for `fabric`, optionally narrowed to one kind.
    pub fn invalidate_fabric(&self, fabric: &str, kind: Option<ResourceKind>) {
        self.store.invalidate_fabric(fabric, kind);
    }

    /// Drop everything.
    pub fn clear_cache(&self) {
        self.store.clear();
    }
}

impl<T: Clone> Default for CacheManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VrfError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key(name: &str) -> CacheKey {
        CacheKey::new(ResourceKind::Vrf, "f1", name)
    }

    #[tokio::test]
    async fn hit_does_not_invoke_fetch() {
        let manager = CacheManager::new();
        manager.update_cache(key("blue"), "cached".to_string(), None);

        let value = manager
            .get_or_fetch(&key("blue"), || async { panic!("fetch must not run") }, None)
            .await
            .unwrap();
        assert_eq!(value.as_deref(), Some("cached"));
    }

    #[tokio::test]
    async fn miss_fetches_once_and_caches() {
        let manager = CacheManager::new();
        let calls = AtomicUsize::new(0);
        let calls = &calls;

        for _ in 0..3 {
            let value = manager
                .get_or_fetch(
                    &key("blue"),
                    || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(Some("fetched".to_string()))
                    },
                    None,
                )
                .await
                .unwrap();
            assert_eq!(value.as_deref(), Some("fetched"));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fetch_failure_caches_nothing() {
        let manager: CacheManager<String> = CacheManager::new();

        let result = manager
            .get_or_fetch(
                &key("blue"),
                || async { Err(VrfError::Http("boom".into())) },
                None,
            )
            .await;
        assert!(result.is_err());

        // Next call fetches again — the failure was not cached.
        let value = manager
            .get_or_fetch(&key("blue"), || async { Ok(Some("ok".to_string())) }, None)
            .await
            .unwrap();
        assert_eq!(value.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn absent_resource_is_not_negatively_cached() {
        let manager: CacheManager<String> = CacheManager::new();
        let calls = AtomicUsize::new(0);
        let calls = &calls;

        for _ in 0..2 {
            let value = manager
                .get_or_fetch(
                    &key("ghost"),
                    || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(None)
                    },
                    None,
                )
                .await
                .unwrap();
            assert!(value.is_none());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn bulk_fetch_runs_once_for_populated_listing() {
        let manager = CacheManager::new();
        let calls = AtomicUsize::new(0);
        let calls = &calls;

        for _ in 0..3 {
            let listing = manager
                .get_bulk_or_fetch(
                    "f1",
                    ResourceKind::Vrf,
                    || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        let mut map = HashMap::new();
                        map.insert("blue".to_string(), "v1".to_string());
                        Ok(map)
                    },
                    None,
                )
                .await
                .unwrap();
            assert_eq!(listing.len(), 1);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn bulk_fetch_caches_empty_fabrics_too() {
        let manager: CacheManager<String> = CacheManager::new();
        let calls = AtomicUsize::new(0);
        let calls = &calls;

        for _ in 0..2 {
            let listing = manager
                .get_bulk_or_fetch(
                    "empty-fabric",
                    ResourceKind::Vrf,
                    || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(HashMap::new())
                    },
                    None,
                )
                .await
                .unwrap();
            assert!(listing.is_empty());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn single_write_through_does_not_satisfy_bulk_read() {
        let manager = CacheManager::new();
        manager.update_cache(key("blue"), "v1".to_string(), None);

        let calls = AtomicUsize::new(0);
        let calls = &calls;
        let listing = manager
            .get_bulk_or_fetch(
                "f1",
                ResourceKind::Vrf,
                || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    let mut map = HashMap::new();
                    map.insert("blue".to_string(), "v1".to_string());
                    map.insert("red".to_string(), "v2".to_string());
                    Ok(map)
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(listing.len(), 2);
    }
}
