use resilience::TimeoutError;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("message {0} not found")]
    NotFound(Uuid),

    /// The store refused a paging state it was handed back
    #[error("paging state rejected: {0}")]
    InvalidCursor(String),

    #[error("storage failure: {0}")]
    Storage(String),

    #[error("store call timed out after {0:?}")]
    Timeout(Duration),
}

impl From<TimeoutError> for StoreError {
    fn from(e: TimeoutError) -> Self {
        StoreError::Timeout(e.0)
    }
}
