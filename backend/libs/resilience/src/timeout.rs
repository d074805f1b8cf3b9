/// Deadline wrapper for async operations
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("operation timed out after {0:?}")]
pub struct TimeoutError(pub Duration);

/// Execute a future with a deadline.
///
/// When the deadline passes the inner future is dropped, which cancels
/// whatever it was waiting on.
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> Result<T, TimeoutError>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(duration, future)
        .await
        .map_err(|_| TimeoutError(duration))
}
