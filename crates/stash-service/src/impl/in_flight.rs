//! Per-key in-flight guards for collapsing concurrent cache misses.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of keys currently being loaded.
///
/// At most one [`FlightGuard`] per key exists at a time; other callers for the
/// same key wait in [`InFlight::acquire`] until it is dropped.
#[derive(Default)]
pub struct InFlight {
    slots: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl InFlight {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other guard for `key` is alive and returns a new one.
    pub async fn acquire(&self, key: &str) -> FlightGuard<'_> {
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(key.to_string()).or_default())
        };

        // Built before waiting so a cancelled waiter still releases the slot.
        let mut guard = FlightGuard {
            owner: self,
            key: key.to_string(),
            slot,
            permit: None,
        };
        guard.permit = Some(Arc::clone(&guard.slot).lock_owned().await);
        guard
    }

    /// Number of keys with a live guard or waiters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// Returns true if no key is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }
}

impl std::fmt::Debug for InFlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InFlight")
            .field("keys", &self.len())
            .finish()
    }
}

/// Exclusive right to load one key. Releases the key on drop.
pub struct FlightGuard<'a> {
    owner: &'a InFlight,
    key: String,
    slot: Arc<AsyncMutex<()>>,
    permit: Option<OwnedMutexGuard<()>>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.permit.take();

        let mut slots = self.owner.slots.lock();
        // Only the registry and this guard still reference the slot: nobody is waiting.
        let idle = Arc::strong_count(&self.slot) == 2;
        if idle && slots.get(&self.key).is_some_and(|s| Arc::ptr_eq(s, &self.slot)) {
            slots.remove(&self.key);
        }
    }
}
