//! Lazy-sweep TTL store.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use super::{CacheEntry, CacheKey, ResourceKind};

/// Key-value store with per-entry expiration and fabric-scoped bulk
/// operations.
///
/// Expiry is passive: every read-path operation first sweeps all
/// currently-expired entries, then answers. There is no background timer.
/// Cache misses and deletes of absent keys are not errors — the store is
/// a best-effort accelerator, never a source of truth.
///
/// The store also tracks which `(fabric, kind)` listings are *fully
/// populated*: [`set_bulk`](Self::set_bulk) marks a listing complete, and
/// [`get_bulk`](Self::get_bulk) only answers for complete listings.
/// A single-entry [`set`](Self::set) never marks a listing complete, so
/// partial cache content (say, one entry written through after a create)
/// is never reported as the whole fabric. Expiry of any member, fabric
/// invalidation, and [`clear`](Self::clear) all drop the mark. A
/// single-entry [`delete`](Self::delete) keeps it — the remaining set is
/// still the complete listing.
///
/// All methods take `&self`; the sweep-then-mutate sequence runs under
/// one internal lock.
pub struct TtlCache<T> {
    inner: Mutex<Inner<T>>,
    default_ttl: Option<Duration>,
}

struct Inner<T> {
    entries: HashMap<CacheKey, CacheEntry<T>>,
    populated: HashSet<(String, ResourceKind)>,
}

impl<T: Clone> TtlCache<T> {
    /// Create an empty store. Entries written without an explicit TTL
    /// fall back to `default_ttl`; `None` means such entries never
    /// expire.
    pub fn new(default_ttl: Option<Duration>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                populated: HashSet::new(),
            }),
            default_ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        // A panicked writer cannot leave the map structurally invalid,
        // so a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the live value for `key`, sweeping expired entries first.
    pub fn get(&self, key: &CacheKey) -> Option<T> {
        let mut inner = self.lock();
        sweep(&mut inner);
        inner.entries.get(key).map(|entry| entry.data().clone())
    }

    /// Insert or overwrite `key`, stamped with "now". An explicit `ttl`
    /// wins over the store default.
    pub fn set(&self, key: CacheKey, value: T, ttl: Option<Duration>) {
        let ttl = ttl.or(self.default_ttl);
        self.lock().entries.insert(key, CacheEntry::new(value, ttl));
    }

    /// Remove `key` if present. Removing an absent key is a no-op.
    pub fn delete(&self, key: &CacheKey) {
        self.lock().entries.remove(key);
    }

    /// All live entries for `(fabric, kind)`, keyed by identifier —
    /// but only when that listing was written complete via
    /// [`set_bulk`](Self::set_bulk) and has not since lost a member to
    /// expiry or invalidation. Returns `None` otherwise.
    pub fn get_bulk(&self, fabric: &str, kind: ResourceKind) -> Option<HashMap<String, T>> {
        let mut inner = self.lock();
        sweep(&mut inner);
        if !inner.populated.contains(&(fabric.to_string(), kind)) {
            return None;
        }
        let map = inner
            .entries
            .iter()
            .filter(|(key, _)| key.fabric() == fabric && key.kind() == kind)
            .map(|(key, entry)| (key.identifier().to_string(), entry.data().clone()))
            .collect();
        Some(map)
    }

    /// Write one entry per identifier, all stamped with the same "now",
    /// and mark the `(fabric, kind)` listing complete. An empty mapping
    /// is a complete answer too (the fabric genuinely has nothing).
    pub fn set_bulk(
        &self,
        fabric: &str,
        kind: ResourceKind,
        data: HashMap<String, T>,
        ttl: Option<Duration>,
    ) {
        let ttl = ttl.or(self.default_ttl);
        let now = Instant::now();
        let mut inner = self.lock();
        for (identifier, value) in data {
            let key = CacheKey::new(kind, fabric, identifier);
            inner.entries.insert(key, CacheEntry::stamped(value, now, ttl));
        }
        inner.populated.insert((fabric.to_string(), kind));
    }

    /// Remove every entry for `fabric`, optionally narrowed to one
    /// resource kind, and drop the affected populated marks.
    pub fn invalidate_fabric(&self, fabric: &str, kind: Option<ResourceKind>) {
        let mut inner = self.lock();
        inner
            .entries
            .retain(|key, _| key.fabric() != fabric || kind.is_some_and(|k| key.kind() != k));
        inner
            .populated
            .retain(|(f, k)| f != fabric || kind.is_some_and(|narrowed| *k != narrowed));
        debug!(fabric, kind = ?kind, "invalidated fabric cache");
    }

    /// Remove everything.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.populated.clear();
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the store holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Remove every expired entry and unmark the listings they belonged to.
fn sweep<T>(inner: &mut Inner<T>) {
    let now = Instant::now();
    let expired: Vec<CacheKey> = inner
        .entries
        .iter()
        .filter(|(_, entry)| entry.is_expired(now))
        .map(|(key, _)| key.clone())
        .collect();
    for key in expired {
        inner
            .populated
            .remove(&(key.fabric().to_string(), key.kind()));
        inner.entries.remove(&key);
    }
}
