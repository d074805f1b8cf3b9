use crate::error::AppError;
use actix_web::{http::StatusCode, HttpResponse};
use error_types::{error_codes, error_types as kinds, ErrorResponse};

/// Map domain errors to HTTP responses
pub fn map_error(err: &AppError) -> (StatusCode, ErrorResponse) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let (error_type, code) = match err {
        AppError::Validation(_) => (kinds::VALIDATION_ERROR, error_codes::VALIDATION_ERROR),
        AppError::InvalidPagingState(_) => {
            (kinds::VALIDATION_ERROR, error_codes::INVALID_PAGING_STATE)
        }
        AppError::NotFound(_) => (kinds::NOT_FOUND_ERROR, error_codes::MESSAGE_NOT_FOUND),
        AppError::Database(_) => (kinds::SERVER_ERROR, error_codes::DATABASE_ERROR),
        AppError::Timeout(_) => (kinds::SERVER_ERROR, error_codes::TIMEOUT),
        AppError::Config(_) => (kinds::SERVER_ERROR, error_codes::INTERNAL_SERVER_ERROR),
    };

    let response = ErrorResponse::for_status(status.as_u16(), &err.to_string(), error_type, code);
    (status, response)
}

pub fn into_response(err: &AppError) -> HttpResponse {
    let (status, response) = map_error(err);

    if status.is_server_error() {
        tracing::error!(error = %err, status = status.as_u16(), "request failed");
    } else {
        tracing::debug!(error = %err, status = status.as_u16(), "request rejected");
    }

    HttpResponse::build(status).json(response)
}
