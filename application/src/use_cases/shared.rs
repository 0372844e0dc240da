//! Shared utilities for use cases.
//!
//! Contains cancellation checking and timeout helpers used across the
//! deliberation use cases.

use crate::use_cases::run_deliberation::RunDeliberationError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(RunDeliberationError::Cancelled)` if the token exists and is cancelled.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), RunDeliberationError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(RunDeliberationError::Cancelled);
    }
    Ok(())
}

/// Await `future`, giving up after `limit` when one is set.
///
/// Returns `None` on timeout.
pub(crate) async fn with_optional_timeout<F: Future>(
    limit: Option<Duration>,
    future: F,
) -> Option<F::Output> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, future).await.ok(),
        None => Some(future.await),
    }
}
