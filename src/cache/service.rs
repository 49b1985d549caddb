//! Resource-typed caching facade.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use crate::Result;

use super::{CacheKey, CacheManager, ResourceKind};

/// Binds a [`CacheManager`] to one [`ResourceKind`] so call sites address
/// entries by fabric and identifier alone.
///
/// Composed into API clients: the client supplies fetch callbacks that
/// hit the controller, and writes through after successful mutations.
pub struct CachedResourceService<T> {
    manager: CacheManager<T>,
    kind: ResourceKind,
}

impl<T: Clone> CachedResourceService<T> {
    pub fn new(manager: CacheManager<T>, kind: ResourceKind) -> Self {
        Self { manager, kind }
    }

    fn key(&self, fabric: &str, identifier: &str) -> CacheKey {
        CacheKey::new(self.kind, fabric, identifier)
    }

    /// Get one resource, fetching on miss.
    pub async fn get_cached<F, Fut>(
        &self,
        fabric: &str,
        identifier: &str,
        fetch: F,
        ttl: Option<Duration>,
    ) -> Result<Option<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        self.manager
            .get_or_fetch(&self.key(fabric, identifier), fetch, ttl)
            .await
    }

    /// Get the complete listing for a fabric, fetching on miss.
    pub async fn get_all_cached<F, Fut>(
        &self,
        fabric: &str,
        fetch: F,
        ttl: Option<Duration>,
    ) -> Result<HashMap<String, T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<HashMap<String, T>>>,
    {
        self.manager
            .get_bulk_or_fetch(fabric, self.kind, fetch, ttl)
            .await
    }

    /// Existence check riding the single-resource cache path.
    pub async fn exists_cached<F, Fut>(
        &self,
        fabric: &str,
        identifier: &str,
        fetch: F,
    ) -> Result<(bool, Option<T>)>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let resource = self.get_cached(fabric, identifier, fetch, None).await?;
        Ok((resource.is_some(), resource))
    }

    /// Write-through after a successful create.
    pub fn update_cache_after_create(&self, fabric: &str, identifier: &str, data: T) {
        self.manager
            .update_cache(self.key(fabric, identifier), data, None);
    }

    /// Write-through after a successful update.
    pub fn update_cache_after_update(&self, fabric: &str, identifier: &str, data: T) {
        self.manager
            .update_cache(self.key(fabric, identifier), data, None);
    }

    /// Drop the entry after a successful delete.
    pub fn remove_from_cache_after_delete(&self, fabric: &str, identifier: &str) {
        self.manager.remove_from_cache(&self.key(fabric, identifier));
    }

    /// Drop every entry of this service's kind for `fabric`.
    pub fn invalidate_fabric_cache(&self, fabric: &str) {
        self.manager.invalidate_fabric(fabric, Some(self.kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> CachedResourceService<String> {
        CachedResourceService::new(CacheManager::new(), ResourceKind::Vrf)
    }

    #[tokio::test]
    async fn exists_reports_presence_and_value() {
        let svc = service();
        let (exists, value) = svc
            .exists_cached("f1", "blue", || async { Ok(Some("v1".to_string())) })
            .await
            .unwrap();
        assert!(exists);
        assert_eq!(value.as_deref(), Some("v1"));

        let (exists, value) = svc
            .exists_cached("f1", "ghost", || async { Ok(None) })
            .await
            .unwrap();
        assert!(!exists);
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn write_through_after_create_hits_on_next_read() {
        let svc = service();
        svc.update_cache_after_create("f1", "blue", "created".to_string());

        let value = svc
            .get_cached("f1", "blue", || async { panic!("fetch must not run") }, None)
            .await
            .unwrap();
        assert_eq!(value.as_deref(), Some("created"));
    }

    #[tokio::test]
    async fn delete_then_read_fetches_again() {
        let svc = service();
        svc.update_cache_after_create("f1", "blue", "created".to_string());
        svc.remove_from_cache_after_delete("f1", "blue");

        let value = svc
            .get_cached("f1", "blue", || async { Ok(None) }, None)
            .await
            .unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn fabric_invalidation_clears_listing() {
        let svc = service();
        let mut all = HashMap::new();
        all.insert("blue".to_string(), "v1".to_string());
        let listing = svc
            .get_all_cached("f1", || async { Ok(all) }, None)
            .await
            .unwrap();
        assert_eq!(listing.len(), 1);

        svc.invalidate_fabric_cache("f1");
        let listing = svc
            .get_all_cached("f1", || async { Ok(HashMap::new()) }, None)
            .await
            .unwrap();
        assert!(listing.is_empty());
    }
}
