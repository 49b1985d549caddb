//! Tests for the TTL cache layer — expiry semantics, read idempotence,
//! fabric isolation, and the populated-listing contract.

use std::collections::HashMap;
use std::time::Duration;

use ndfc_vrf::cache::{CacheKey, CacheManager, ResourceKind, TtlCache};

fn key(fabric: &str, name: &str) -> CacheKey {
    CacheKey::new(ResourceKind::Vrf, fabric, name)
}

// =============================================================================
// TTL correctness (paused tokio clock)
// =============================================================================

#[tokio::test(start_paused = true)]
async fn entry_lives_until_its_ttl_and_no_longer() {
    let cache = TtlCache::new(None);
    cache.set(key("f1", "blue"), "v1".to_string(), Some(Duration::from_secs(300)));

    // Any query time before t0 + TTL sees the value.
    for _ in 0..4 {
        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(cache.get(&key("f1", "blue")).as_deref(), Some("v1"));
    }

    // Past t0 + TTL it is gone.
    tokio::time::advance(Duration::from_secs(120)).await;
    assert!(cache.get(&key("f1", "blue")).is_none());
}

#[tokio::test(start_paused = true)]
async fn entry_without_ttl_is_never_evicted() {
    let cache = TtlCache::new(None);
    cache.set(key("f1", "forever"), "v1".to_string(), None);

    // A year of polling, interleaved with sweeps triggered by other
    // expiring entries.
    for day in 0..12 {
        cache.set(
            key("f1", &format!("short-{day}")),
            "tmp".to_string(),
            Some(Duration::from_secs(60)),
        );
        tokio::time::advance(Duration::from_secs(30 * 86_400)).await;
        assert_eq!(cache.get(&key("f1", "forever")).as_deref(), Some("v1"));
    }
    assert_eq!(cache.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn repeated_reads_are_idempotent() {
    let cache = TtlCache::new(None);
    cache.set(key("f1", "blue"), "v1".to_string(), None);
    cache.set(key("f1", "doomed"), "v2".to_string(), Some(Duration::from_secs(10)));

    tokio::time::advance(Duration::from_secs(20)).await;

    // First read sweeps the expired unrelated entry; the second read
    // observes exactly the same state.
    let first = cache.get(&key("f1", "blue"));
    let second = cache.get(&key("f1", "blue"));
    assert_eq!(first, second);
    assert_eq!(first.as_deref(), Some("v1"));
    assert_eq!(cache.len(), 1);
}

// =============================================================================
// Fabric isolation
// =============================================================================

#[tokio::test]
async fn bulk_writes_do_not_leak_across_fabrics() {
    let cache = TtlCache::new(None);
    let mut data = HashMap::new();
    data.insert("blue".to_string(), "v1".to_string());
    data.insert("red".to_string(), "v2".to_string());
    cache.set_bulk("fabric-a", ResourceKind::Vrf, data, None);

    assert!(cache.get_bulk("fabric-b", ResourceKind::Vrf).is_none());
    assert!(cache.get(&key("fabric-b", "blue")).is_none());
    assert_eq!(
        cache.get_bulk("fabric-a", ResourceKind::Vrf).unwrap().len(),
        2
    );
}

#[tokio::test]
async fn kinds_do_not_share_entries() {
    let cache = TtlCache::new(None);
    cache.set(
        CacheKey::new(ResourceKind::Vrf, "f1", "blue"),
        "vrf".to_string(),
        None,
    );
    assert!(
        cache
            .get(&CacheKey::new(ResourceKind::VrfAttachment, "f1", "blue"))
            .is_none()
    );
}

// =============================================================================
// Manager: TTL resolution and fetch behaviour under the clock
// =============================================================================

#[tokio::test(start_paused = true)]
async fn manager_default_ttl_expires_cached_fetches() {
    let manager: CacheManager<String> = CacheManager::new(); // 300s default
    let key = key("f1", "blue");

    let value = manager
        .get_or_fetch(&key, || async { Ok(Some("first".to_string())) }, None)
        .await
        .unwrap();
    assert_eq!(value.as_deref(), Some("first"));

    // Within the TTL the fetch is not consulted.
    tokio::time::advance(Duration::from_secs(200)).await;
    let value = manager
        .get_or_fetch(&key, || async { Ok(Some("second".to_string())) }, None)
        .await
        .unwrap();
    assert_eq!(value.as_deref(), Some("first"));

    // Past it, the next read fetches fresh.
    tokio::time::advance(Duration::from_secs(200)).await;
    let value = manager
        .get_or_fetch(&key, || async { Ok(Some("third".to_string())) }, None)
        .await
        .unwrap();
    assert_eq!(value.as_deref(), Some("third"));
}

#[tokio::test(start_paused = true)]
async fn expired_bulk_listing_triggers_refetch() {
    let manager: CacheManager<String> = CacheManager::new();

    let mut first = HashMap::new();
    first.insert("blue".to_string(), "v1".to_string());
    let listing = manager
        .get_bulk_or_fetch("f1", ResourceKind::Vrf, || async { Ok(first) }, None)
        .await
        .unwrap();
    assert_eq!(listing.len(), 1);

    tokio::time::advance(Duration::from_secs(400)).await;

    let mut second = HashMap::new();
    second.insert("red".to_string(), "v2".to_string());
    let listing = manager
        .get_bulk_or_fetch("f1", ResourceKind::Vrf, || async { Ok(second) }, None)
        .await
        .unwrap();
    assert!(listing.contains_key("red"));
    assert!(!listing.contains_key("blue"));
}

// =============================================================================
// Thread safety
// =============================================================================

#[test]
fn concurrent_readers_and_writers_do_not_panic() {
    use std::sync::Arc;
    use std::thread;

    let cache: Arc<TtlCache<String>> = Arc::new(TtlCache::new(None));
    let mut handles = Vec::new();

    for i in 0..10 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            cache.set(key("f1", &format!("vrf-{i}")), format!("v{i}"), None);
        }));
    }
    for i in 0..10 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            // May or may not see the entry yet; must not panic.
            let _ = cache.get(&key("f1", &format!("vrf-{i}")));
        }));
    }

    for handle in handles {
        handle.join().expect("thread panicked");
    }

    for i in 0..10 {
        assert!(cache.get(&key("f1", &format!("vrf-{i}"))).is_some());
    }
}
