//! Cache-aside implementation of [`UserLookupService`].

use super::InFlight;
use crate::cache::{cache_keys, CacheInterface, DEFAULT_TTL};
use crate::observer::{LookupEvent, LookupObserver, LookupOutcome};
use crate::timeout::with_timeout;
use crate::user_lookup::UserLookupService;
use async_trait::async_trait;
use shaku::Component;
use stash_config::{CacheConfig, CacheErrorPolicy};
use stash_core::{StashError, StashResult, User, UserId};
use stash_repository::UserRepository;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Tuning knobs of the lookup path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupSettings {
    /// Absolute expiration of populated entries.
    pub ttl: Duration,
    /// Bound on a whole lookup; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Collapse concurrent misses for the same id.
    pub single_flight: bool,
    /// Reaction to cache failures.
    pub on_cache_error: CacheErrorPolicy,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            timeout: None,
            single_flight: false,
            on_cache_error: CacheErrorPolicy::Propagate,
        }
    }
}

impl From<&CacheConfig> for LookupSettings {
    fn from(config: &CacheConfig) -> Self {
        Self {
            ttl: config.ttl(),
            timeout: config.lookup_timeout(),
            single_flight: config.single_flight,
            on_cache_error: config.on_cache_error,
        }
    }
}

/// Cache-aside user lookup.
///
/// Reads the cache under the decimal id, falls back to the primary store on a
/// miss and populates the cache before returning. Absent records are never
/// cached.
#[derive(Component)]
#[shaku(interface = UserLookupService)]
pub struct CacheAsideUserLookup {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    #[shaku(inject)]
    observer: Arc<dyn LookupObserver>,
    #[shaku(default)]
    settings: LookupSettings,
    #[shaku(force_default)]
    in_flight: InFlight,
}

impl CacheAsideUserLookup {
    /// Creates a lookup with default settings.
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        cache: Arc<dyn CacheInterface>,
        observer: Arc<dyn LookupObserver>,
    ) -> Self {
        Self {
            user_repository,
            cache,
            observer,
            settings: LookupSettings::default(),
            in_flight: InFlight::new(),
        }
    }

    /// Replaces the settings.
    #[must_use]
    pub fn with_settings(mut self, settings: LookupSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Current settings.
    #[must_use]
    pub const fn settings(&self) -> &LookupSettings {
        &self.settings
    }

    async fn resolve(&self, id: UserId) -> StashResult<(Option<User>, LookupOutcome)> {
        let key = cache_keys::user_by_id(id);

        if let Some(user) = self.read_cached(id, &key).await? {
            debug!("Cache hit for user: {}", id);
            return Ok((Some(user), LookupOutcome::Hit));
        }

        if !self.settings.single_flight {
            return self.load(id, &key).await;
        }

        let _guard = self.in_flight.acquire(&key).await;
        // Whoever held the guard before us has most likely populated the entry.
        if let Some(user) = self.read_cached(id, &key).await? {
            debug!("Cache hit for user {} after waiting on in-flight load", id);
            return Ok((Some(user), LookupOutcome::Hit));
        }
        self.load(id, &key).await
    }

    /// Reads and decodes the cached record. Undecodable entries read as absent.
    async fn read_cached(&self, id: UserId, key: &str) -> StashResult<Option<User>> {
        let payload = match self.cache.get_raw(key).await {
            Ok(payload) => payload,
            Err(e) => return self.cache_failure(e, "read").map(|()| None),
        };

        let Some(payload) = payload else {
            return Ok(None);
        };

        match serde_json::from_str::<User>(&payload) {
            Ok(user) if user.id == id => Ok(Some(user)),
            Ok(user) => {
                warn!(
                    "Ignoring cache entry '{}' holding user {} instead of {}",
                    key, user.id, id
                );
                Ok(None)
            }
            Err(e) => {
                warn!("Ignoring corrupt cache entry '{}': {}", key, e);
                Ok(None)
            }
        }
    }

    /// Queries the store and populates the cache with what it returns.
    async fn load(&self, id: UserId, key: &str) -> StashResult<(Option<User>, LookupOutcome)> {
        debug!("Cache miss for user: {}", id);

        let Some(user) = self.user_repository.find_by_id(id).await? else {
            debug!("User {} not found in store", id);
            return Ok((None, LookupOutcome::NotFound));
        };

        let payload = serde_json::to_string(&user)?;
        if let Err(e) = self.cache.set_raw(key, &payload, self.settings.ttl).await {
            self.cache_failure(e, "write")?;
        }

        // Hand back exactly what a later hit will decode.
        let user: User = serde_json::from_str(&payload)?;
        Ok((Some(user), LookupOutcome::Miss))
    }

    fn cache_failure(&self, error: StashError, operation: &str) -> StashResult<()> {
        match self.settings.on_cache_error {
            CacheErrorPolicy::Propagate => Err(error),
            CacheErrorPolicy::Fallback => {
                warn!("Cache {} failed, continuing without cache: {}", operation, error);
                Ok(())
            }
        }
    }
}

#[async_trait]
impl UserLookupService for CacheAsideUserLookup {
    async fn get_user(&self, id: UserId) -> StashResult<Option<User>> {
        let started = Instant::now();

        let result = match self.settings.timeout {
            Some(limit) => with_timeout(limit, || self.resolve(id)).await,
            None => self.resolve(id).await,
        };

        let outcome = match &result {
            Ok((_, outcome)) => *outcome,
            Err(_) => LookupOutcome::Error,
        };
        self.observer.on_lookup(&LookupEvent {
            id,
            outcome,
            latency: started.elapsed(),
        });

        result.map(|(user, _)| user)
    }
}

impl std::fmt::Debug for CacheAsideUserLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheAsideUserLookup")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
