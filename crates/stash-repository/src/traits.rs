//! Repository trait definitions.

use async_trait::async_trait;
use stash_core::{Interface, StashResult, User, UserId};

/// User repository trait.
///
/// The lookup path only reads; records are seeded by migrations.
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> StashResult<Option<User>>;
}
