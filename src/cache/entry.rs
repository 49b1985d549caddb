//! Cache entries with optional time-to-live.

use std::time::Duration;

use tokio::time::Instant;

/// A cached payload stamped with its creation time and an optional TTL.
///
/// An entry with no TTL never expires; it lives until explicitly deleted
/// or its fabric is invalidated.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    data: T,
    stored_at: Instant,
    ttl: Option<Duration>,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T, ttl: Option<Duration>) -> Self {
        Self {
            data,
            stored_at: Instant::now(),
            ttl,
        }
    }

    /// Build an entry with an explicit creation instant, so bulk writes
    /// can stamp every entry with the same "now".
    pub fn stamped(data: T, stored_at: Instant, ttl: Option<Duration>) -> Self {
        Self {
            data,
            stored_at,
            ttl,
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    /// True iff a TTL is set and `now` is strictly past `stored_at + ttl`.
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now > self.stored_at + ttl,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn entry_without_ttl_never_expires() {
        let entry = CacheEntry::new("value", None);
        tokio::time::advance(Duration::from_secs(86_400)).await;
        assert!(!entry.is_expired(Instant::now()));
    }

    #[tokio::test(start_paused = true)]
    async fn entry_expires_after_ttl() {
        let entry = CacheEntry::new("value", Some(Duration::from_secs(60)));
        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(!entry.is_expired(Instant::now()));
        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(entry.is_expired(Instant::now()));
    }

    #[tokio::test(start_paused = true)]
    async fn entry_live_at_exact_ttl_boundary() {
        // Expiry is strict: `now > stored_at + ttl`.
        let entry = CacheEntry::new("value", Some(Duration::from_secs(60)));
        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(!entry.is_expired(Instant::now()));
    }
}
