use crate::middleware::error_handling;
use crate::repository::{CursorError, StoreError};
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid paging state: {0}")]
    InvalidPagingState(String),

    #[error("message {0} not found")]
    NotFound(Uuid),

    #[error("database error: {0}")]
    Database(String),

    #[error("database call timed out after {0:?}")]
    Timeout(Duration),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => AppError::NotFound(id),
            StoreError::InvalidCursor(msg) => AppError::InvalidPagingState(msg),
            StoreError::Storage(msg) => AppError::Database(msg),
            StoreError::Timeout(d) => AppError::Timeout(d),
        }
    }
}

impl From<CursorError> for AppError {
    fn from(e: CursorError) -> Self {
        AppError::InvalidPagingState(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl AppError {
    /// Returns HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Validation(_) | AppError::InvalidPagingState(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::Timeout(_) => 504,
            AppError::Config(_) | AppError::Database(_) => 500,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(AppError::status_code(self))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        error_handling::into_response(self)
    }
}
