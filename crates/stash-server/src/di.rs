//! Dependency injection module using Shaku.
//!
//! Two module shapes exist, differing only in the cache backend:
//! - `RedisModule`: distributed cache through a Redis pool
//! - `MemoryModule`: process-local cache for runs without Redis

use shaku::HasComponent;
use stash_config::{AppConfig, RedisConfig};
use stash_core::{module, StashError, StashResult};
use stash_repository::{
    DatabasePool, DatabasePoolInterface, DatabasePoolParameters, SqliteUserRepository,
};
use stash_service::{
    CacheAsideUserLookup, CacheAsideUserLookupParameters, LookupSettings, MemoryCacheService,
    RedisCacheService, RedisCacheServiceParameters, TracingLookupObserver,
    TracingLookupObserverParameters, UserLookupService,
};
use std::sync::Arc;
use tracing::info;

// ============================================================================
// Shaku Module Definitions
// ============================================================================

module! {
    pub RedisModule {
        components = [
            DatabasePool,
            SqliteUserRepository,
            RedisCacheService,
            TracingLookupObserver,
            CacheAsideUserLookup,
        ],
        providers = [],
    }
}

module! {
    pub MemoryModule {
        components = [
            DatabasePool,
            SqliteUserRepository,
            MemoryCacheService,
            TracingLookupObserver,
            CacheAsideUserLookup,
        ],
        providers = [],
    }
}

// ============================================================================
// Module Builders
// ============================================================================

/// Creates the Redis connection pool. Connections are opened lazily.
pub fn create_redis_pool(redis_config: &RedisConfig) -> StashResult<Arc<deadpool_redis::Pool>> {
    let mut redis_cfg = deadpool_redis::Config::from_url(&redis_config.url);
    redis_cfg.pool = Some(deadpool_redis::PoolConfig::new(redis_config.pool_size));

    let pool = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .map_err(|e| StashError::cache(format!("Failed to create Redis pool: {}", e)))?;
    Ok(Arc::new(pool))
}

fn lookup_parameters(config: &AppConfig) -> CacheAsideUserLookupParameters {
    CacheAsideUserLookupParameters {
        settings: LookupSettings::from(&config.cache),
    }
}

fn observer_parameters(config: &AppConfig) -> TracingLookupObserverParameters {
    TracingLookupObserverParameters {
        metrics_enabled: config.observability.metrics_enabled,
    }
}

/// Builds a module backed by Redis.
pub fn build_redis_module(
    config: &AppConfig,
    db_pool: &DatabasePool,
) -> StashResult<Arc<RedisModule>> {
    let redis_pool = create_redis_pool(&config.redis)?;

    let module = RedisModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: db_pool.inner().clone(),
        })
        .with_component_parameters::<RedisCacheService>(RedisCacheServiceParameters {
            pool: redis_pool,
            instance_name: config.redis.instance_name.clone(),
        })
        .with_component_parameters::<TracingLookupObserver>(observer_parameters(config))
        .with_component_parameters::<CacheAsideUserLookup>(lookup_parameters(config))
        .build();

    Ok(Arc::new(module))
}

/// Builds a module backed by the in-memory cache.
pub fn build_memory_module(config: &AppConfig, db_pool: &DatabasePool) -> Arc<MemoryModule> {
    let module = MemoryModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: db_pool.inner().clone(),
        })
        .with_component_parameters::<TracingLookupObserver>(observer_parameters(config))
        .with_component_parameters::<CacheAsideUserLookup>(lookup_parameters(config))
        .build();

    Arc::new(module)
}

// ============================================================================
// Module Resolution Helpers
// ============================================================================

/// Trait for resolving the services the server needs from any module.
pub trait ServiceResolver {
    /// Resolves the user lookup service.
    fn user_lookup(&self) -> Arc<dyn UserLookupService>;

    /// Resolves the database pool.
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface>;
}

impl ServiceResolver for RedisModule {
    fn user_lookup(&self) -> Arc<dyn UserLookupService> {
        self.resolve()
    }

    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.resolve()
    }
}

impl ServiceResolver for MemoryModule {
    fn user_lookup(&self) -> Arc<dyn UserLookupService> {
        self.resolve()
    }

    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.resolve()
    }
}

/// Services resolved from whichever module the configuration selects.
#[derive(Clone)]
pub struct Services {
    pub user_lookup: Arc<dyn UserLookupService>,
    pub database_pool: Arc<dyn DatabasePoolInterface>,
}

impl Services {
    fn resolve_from(module: &impl ServiceResolver) -> Self {
        Self {
            user_lookup: module.user_lookup(),
            database_pool: module.database_pool(),
        }
    }
}

/// Wires the components selected by `config` around an open database pool.
pub fn build_services(config: &AppConfig, db_pool: &DatabasePool) -> StashResult<Services> {
    if config.redis.enabled {
        info!("Using Redis cache at {}", config.redis.url);
        let module = build_redis_module(config, db_pool)?;
        Ok(Services::resolve_from(module.as_ref()))
    } else {
        info!("Redis disabled, using in-memory cache");
        let module = build_memory_module(config, db_pool);
        Ok(Services::resolve_from(module.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stash_config::DatabaseConfig;
    use stash_core::{User, UserId};
    use stash_repository::UserRepository;
    use stash_service::CacheInterface;

    #[test]
    fn test_module_types_exist() {
        fn _assert_service_resolver<T: ServiceResolver>() {}

        _assert_service_resolver::<RedisModule>();
        _assert_service_resolver::<MemoryModule>();
    }

    #[test]
    fn test_has_component_trait_bounds() {
        fn _assert_has_user_repository<T: HasComponent<dyn UserRepository>>() {}
        fn _assert_has_cache<T: HasComponent<dyn CacheInterface>>() {}

        _assert_has_user_repository::<RedisModule>();
        _assert_has_user_repository::<MemoryModule>();
        _assert_has_cache::<RedisModule>();
        _assert_has_cache::<MemoryModule>();
    }

    async fn memory_pool() -> DatabasePool {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            min_connections: 1,
            max_connections: 1,
            ..DatabaseConfig::default()
        };
        let pool = DatabasePool::new(&config).await.unwrap();
        pool.run_migrations().await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_memory_module_serves_seeded_users() {
        let mut config = AppConfig::default();
        config.redis.enabled = false;
        config.observability.metrics_enabled = false;

        let services = build_services(&config, &memory_pool().await).unwrap();

        let user = services.user_lookup.get_user(UserId::new(1)).await.unwrap();
        assert_eq!(user, Some(User::new(1, Some("Kirrik".to_string()), 23)));
        assert_eq!(services.user_lookup.get_user(UserId::new(3)).await.unwrap(), None);
        services.database_pool.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_module_builds_with_default_cache_parameters() {
        let config = AppConfig::default();
        let module = build_memory_module(&config, &memory_pool().await);

        let cache: Arc<dyn CacheInterface> = module.resolve();
        assert_eq!(cache.get_raw("1").await.unwrap(), None);

        let lookup: Arc<dyn UserLookupService> = module.resolve();
        assert!(lookup.get_user(UserId::new(2)).await.unwrap().is_some());
        assert!(cache.get_raw("2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_redis_module_builds_without_connecting() {
        let mut config = AppConfig::default();
        config.redis.url = "redis://127.0.0.1:1".to_string();
        config.observability.metrics_enabled = false;

        let services = build_services(&config, &memory_pool().await).unwrap();

        // Default policy propagates cache failures.
        let err = services.user_lookup.get_user(UserId::new(1)).await.unwrap_err();
        assert!(matches!(err, StashError::Cache(_)));
    }

    #[test]
    fn test_invalid_redis_url_is_rejected() {
        let config = RedisConfig {
            url: "not a url".to_string(),
            ..RedisConfig::default()
        };
        assert!(create_redis_pool(&config).is_err());
    }
}
