//! Caching subsystem.
//!
//! A passive TTL cache for controller-observed resource state, layered as:
//!
//! - [`TtlCache`] — the store: a keyed map with per-entry expiry, swept
//!   lazily on every read path. No timers, no background eviction.
//!
//! - [`CacheManager`] — get-or-fetch orchestration on top of the store,
//!   owning the default TTL. At most one fetch per miss; no single-flight
//!   guarantee across concurrent callers (the cache is a local
//!   accelerator over an authoritative remote source, not a consistency
//!   boundary).
//!
//! - [`CachedResourceService`] — a facade binding a manager to one
//!   [`ResourceKind`] so call sites address entries by identifier alone.
//!
//! Entries are keyed by [`CacheKey`] — `(kind, fabric, identifier)` — and
//! the store additionally tracks which `(fabric, kind)` listings are
//! *fully populated*, so a partial cache (e.g. one entry written after a
//! create) is never mistaken for a complete fabric listing.

mod entry;
mod key;
mod manager;
mod service;
mod store;

pub use entry::CacheEntry;
pub use key::CacheKey;
pub use manager::CacheManager;
pub use service::CachedResourceService;
pub use store::TtlCache;

/// The resource kinds this crate caches.
///
/// Part of every [`CacheKey`]; also scopes bulk operations and fabric
/// invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Vrf,
    VrfAttachment,
}

impl ResourceKind {
    /// Token used in diagnostics and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Vrf => "vrf",
            ResourceKind::VrfAttachment => "vrf_attachment",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
