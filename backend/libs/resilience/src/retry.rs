/// Bounded retry with a fixed backoff
use std::future::Future;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Delay between two attempts
    pub backoff: Duration,
}

impl RetryConfig {
    /// Same delay between every attempt.
    pub fn fixed(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    #[error("gave up after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: E },
}

impl<E> RetryError<E> {
    pub fn into_last_error(self) -> E {
        match self {
            RetryError::Exhausted { last_error, .. } => last_error,
        }
    }
}

/// Run `f` until it succeeds or `config.max_attempts` attempts have failed.
///
/// Every failure is logged with the attempt number. All errors are treated
/// alike; there is no classification into transient and permanent failures.
pub async fn with_retry<F, Fut, T, E>(
    config: &RetryConfig,
    operation: &str,
    mut f: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                warn!(
                    operation,
                    attempt,
                    max_attempts,
                    error = %e,
                    "attempt failed"
                );

                if attempt >= max_attempts {
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        last_error: e,
                    });
                }

                tokio::time::sleep(config.backoff).await;
            }
        }
    }
}
