//! Distributed cache abstraction for the lookup service.
//!
//! Values are opaque strings with an absolute expiration. Redis backs the
//! cache in deployments; the in-memory store serves local runs and tests.

mod cache_interface;
pub mod cache_keys;
mod memory_cache;
mod redis_cache;

pub use cache_interface::CacheInterface;
pub use memory_cache::{MemoryCacheService, MemoryCacheServiceParameters};
pub use redis_cache::{
    RedisCacheService, RedisCacheServiceParameters, DEFAULT_INSTANCE_NAME, DEFAULT_TTL,
};
