//! Redis-based cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool};
use shaku::Component;
use stash_core::{StashError, StashResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default TTL for cached user records (2 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(120);

/// Default prefix prepended to every key at the Redis layer.
pub const DEFAULT_INSTANCE_NAME: &str = "local";

/// Redis-based cache service.
#[derive(Component)]
#[shaku(interface = CacheInterface)]
pub struct RedisCacheService {
    /// Redis connection pool.
    pool: Arc<Pool>,
    /// Prefix shared by all keys of this instance.
    #[shaku(default = DEFAULT_INSTANCE_NAME.to_string())]
    instance_name: String,
}

impl RedisCacheService {
    /// Create a new Redis cache service with the default instance name.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self::with_instance_name(pool, DEFAULT_INSTANCE_NAME)
    }

    /// Create a cache service whose keys carry the given prefix.
    #[must_use]
    pub fn with_instance_name(pool: Arc<Pool>, instance_name: impl Into<String>) -> Self {
        Self {
            pool,
            instance_name: instance_name.into(),
        }
    }

    /// Key as stored in Redis.
    fn physical_key(&self, key: &str) -> String {
        format!("{}{}", self.instance_name, key)
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> StashResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| StashError::cache(format!("Failed to get Redis connection: {}", e)))
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    async fn get_raw(&self, key: &str) -> StashResult<Option<String>> {
        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn.get(self.physical_key(key)).await.map_err(|e| {
            StashError::cache(format!("Failed to get key '{}': {}", key, e))
        })?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> StashResult<()> {
        let mut conn = self.get_conn().await?;
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);

        conn.pset_ex::<_, _, ()>(self.physical_key(key), value, ttl_ms)
            .await
            .map_err(|e| StashError::cache(format!("Failed to set key '{}': {}", key, e)))?;

        debug!("Cached key '{}' with TTL {}ms", key, ttl_ms);
        Ok(())
    }
}

impl std::fmt::Debug for RedisCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheService")
            .field("instance_name", &self.instance_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deadpool_redis::{Config, Runtime};

    fn unreachable_pool() -> Arc<Pool> {
        // Nothing listens on port 1; connections are only opened on first use.
        let cfg = Config::from_url("redis://127.0.0.1:1");
        Arc::new(
            cfg.create_pool(Some(Runtime::Tokio1))
                .expect("Failed to build pool"),
        )
    }

    #[test]
    fn test_physical_key_carries_instance_name() {
        let cache = RedisCacheService::new(unreachable_pool());
        assert_eq!(cache.physical_key("1"), "local1");

        let cache = RedisCacheService::with_instance_name(unreachable_pool(), "");
        assert_eq!(cache.physical_key("42"), "42");
    }

    #[tokio::test]
    async fn test_unreachable_redis_is_cache_error() {
        let cache = RedisCacheService::new(unreachable_pool());

        let err = cache.get_raw("1").await.unwrap_err();
        assert!(matches!(err, StashError::Cache(_)));

        let err = cache.set_raw("1", "{}", DEFAULT_TTL).await.unwrap_err();
        assert!(matches!(err, StashError::Cache(_)));
    }
}
