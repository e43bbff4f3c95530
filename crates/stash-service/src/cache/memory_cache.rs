//! Process-local cache used when Redis is disabled.

use super::CacheInterface;
use async_trait::async_trait;
use shaku::Component;
use stash_core::StashResult;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// A stored value with its absolute expiry.
///
/// `expires_at` is `None` when the TTL reaches past what the clock can represent.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now().checked_add(ttl),
        }
    }

    /// An entry is expired once its TTL has fully elapsed.
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }

    fn ttl_remaining(&self) -> Duration {
        self.expires_at
            .map_or(Duration::MAX, |at| at.saturating_duration_since(Instant::now()))
    }
}

/// In-memory cache with per-entry expiration on the tokio clock.
///
/// Expired entries read as absent and are purged on access.
#[derive(Component, Default)]
#[shaku(interface = CacheInterface)]
pub struct MemoryCacheService {
    #[shaku(force_default)]
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCacheService {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time left before `key` expires, or `None` if it is absent.
    pub async fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(CacheEntry::ttl_remaining)
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CacheInterface for MemoryCacheService {
    async fn get_raw(&self, key: &str) -> StashResult<Option<String>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => {
                    debug!("Cache miss for key '{}'", key);
                    return Ok(None);
                }
                Some(entry) if !entry.is_expired() => {
                    debug!("Cache hit for key '{}'", key);
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        // Re-check: a writer may have refreshed the entry in between.
        if entries.get(key).is_some_and(CacheEntry::is_expired) {
            entries.remove(key);
            debug!("Purged expired key '{}'", key);
            return Ok(None);
        }
        Ok(entries.get(key).map(|entry| entry.value.clone()))
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> StashResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), CacheEntry::new(value.to_string(), ttl));
        debug!("Cached key '{}' with TTL {:?}", key, ttl);
        Ok(())
    }
}

impl std::fmt::Debug for MemoryCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCacheService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCacheService::new();
        cache.set_raw("1", "value", Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get_raw("1").await.unwrap().as_deref(), Some("value"));
        assert_eq!(cache.get_raw("2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let cache = MemoryCacheService::new();
        cache.set_raw("1", "old", Duration::from_secs(60)).await.unwrap();
        cache.set_raw("1", "new", Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get_raw("1").await.unwrap().as_deref(), Some("new"));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = MemoryCacheService::new();
        cache.set_raw("1", "value", Duration::from_secs(120)).await.unwrap();

        tokio::time::advance(Duration::from_secs(119)).await;
        assert!(cache.get_raw("1").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get_raw("1").await.unwrap().is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_remaining() {
        let cache = MemoryCacheService::new();
        assert_eq!(cache.ttl_remaining("1").await, None);

        cache.set_raw("1", "value", Duration::from_secs(120)).await.unwrap();
        tokio::time::advance(Duration::from_secs(20)).await;

        assert_eq!(cache.ttl_remaining("1").await, Some(Duration::from_secs(100)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rewrite_restarts_expiration() {
        let cache = MemoryCacheService::new();
        cache.set_raw("1", "a", Duration::from_secs(10)).await.unwrap();
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.set_raw("1", "b", Duration::from_secs(10)).await.unwrap();
        tokio::time::advance(Duration::from_secs(8)).await;

        assert_eq!(cache.get_raw("1").await.unwrap().as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_unrepresentable_ttl_never_expires() {
        let cache = MemoryCacheService::new();
        cache.set_raw("1", "value", Duration::MAX).await.unwrap();

        assert_eq!(cache.get_raw("1").await.unwrap().as_deref(), Some("value"));
        assert_eq!(cache.ttl_remaining("1").await, Some(Duration::MAX));
    }
}
