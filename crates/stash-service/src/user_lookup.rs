//! User lookup service trait definition.

use async_trait::async_trait;
use stash_core::{Interface, StashResult, User, UserId};

/// Read-through access to user records.
#[async_trait]
pub trait UserLookupService: Interface + Send + Sync {
    /// Looks a user up by id, consulting the cache before the primary store.
    ///
    /// Returns `Ok(None)` when neither holds the record.
    async fn get_user(&self, id: UserId) -> StashResult<Option<User>>;
}
