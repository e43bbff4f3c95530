//! Cache interface trait for abstracted caching operations.

use async_trait::async_trait;
use shaku::Interface;
use stash_core::StashResult;
use std::time::Duration;

/// String-valued cache with absolute per-entry expiration.
///
/// Uses strings for type-erased storage to maintain dyn-compatibility.
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Get a raw value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> StashResult<Option<String>>;

    /// Store a raw value that expires `ttl` after this write.
    ///
    /// Overwrites any existing value for the key.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> StashResult<()>;
}
