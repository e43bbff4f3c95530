//! Timeout wrapper for async operations.

use stash_core::StashError;
use std::future::Future;
use std::time::Duration;

/// Runs `f` to completion or fails with [`StashError::Timeout`] once `duration` elapses.
///
/// The future is dropped on expiry, cancelling any work it had in flight.
pub async fn with_timeout<F, Fut, T>(duration: Duration, f: F) -> Result<T, StashError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, StashError>>,
{
    tokio::time::timeout(duration, f())
        .await
        .map_err(|_| StashError::Timeout(format!("Operation timed out after {:?}", duration)))?
}
