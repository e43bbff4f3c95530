//! Application state for Axum handlers.

use stash_service::UserLookupService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_lookup: Arc<dyn UserLookupService>,
    /// Answer unknown ids with 404 instead of 200.
    pub strict_not_found: bool,
}

impl AppState {
    /// Creates a new application state with the lenient not-found behavior.
    pub fn new(user_lookup: Arc<dyn UserLookupService>) -> Self {
        Self {
            user_lookup,
            strict_not_found: false,
        }
    }

    /// Sets whether unknown ids are answered with 404.
    #[must_use]
    pub fn with_strict_not_found(mut self, strict: bool) -> Self {
        self.strict_not_found = strict;
        self
    }
}
