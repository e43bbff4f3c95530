//! Cache key generators.

use stash_core::UserId;

/// Cache key of a user record: the decimal form of its id.
#[must_use]
pub fn user_by_id(id: UserId) -> String {
    id.to_string()
}
