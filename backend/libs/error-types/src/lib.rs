//! Shared error response format for Nova HTTP services.
//!
//! Services keep their own error enums and map them onto [`ErrorResponse`]
//! together with one of the [`error_types`] categories and [`error_codes`].

use serde::{Deserialize, Serialize};

/// Unified API error body returned by every service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short reason phrase ("Bad Request", "Not Found", ...)
    pub error: String,

    /// Human readable description of what went wrong
    pub message: String,

    /// HTTP status code
    pub status: u16,

    /// Error category used by clients for routing, see [`error_types`]
    pub error_type: String,

    /// Stable machine-readable code, see [`error_codes`]
    pub code: String,

    /// ISO 8601 timestamp
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str, status: u16, error_type: &str, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            status,
            error_type: error_type.to_string(),
            code: code.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Build a response whose `error` field is the reason phrase of `status`.
    pub fn for_status(status: u16, message: &str, error_type: &str, code: &str) -> Self {
        Self::new(reason_phrase(status), message, status, error_type, code)
    }
}

/// Reason phrase for the status codes our services emit.
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Error",
    }
}

/// Standard error codes
pub mod error_codes {
    // Request validation
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const INVALID_PAGING_STATE: &str = "INVALID_PAGING_STATE";

    // Message store
    pub const MESSAGE_NOT_FOUND: &str = "MESSAGE_NOT_FOUND";

    // Database/System
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
    pub const TIMEOUT: &str = "TIMEOUT";
    pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
    pub const SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";
}

/// Standard error categories
pub mod error_types {
    pub const VALIDATION_ERROR: &str = "validation_error";
    pub const NOT_FOUND_ERROR: &str = "not_found_error";
    pub const SERVER_ERROR: &str = "server_error";
    pub const SERVICE_UNAVAILABLE_ERROR: &str = "service_unavailable_error";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_creation() {
        let error = ErrorResponse::new(
            "Not Found",
            "message not found",
            404,
            error_types::NOT_FOUND_ERROR,
            error_codes::MESSAGE_NOT_FOUND,
        );

        assert_eq!(error.status, 404);
        assert_eq!(error.error_type, error_types::NOT_FOUND_ERROR);
        assert_eq!(error.code, error_codes::MESSAGE_NOT_FOUND);
    }

    #[test]
    fn test_for_status_uses_reason_phrase() {
        let error = ErrorResponse::for_status(
            504,
            "database call timed out",
            error_types::SERVER_ERROR,
            error_codes::TIMEOUT,
        );

        assert_eq!(error.error, "Gateway Timeout");
        assert_eq!(error.status, 504);
    }

    #[test]
    fn test_body_shape() {
        let error = ErrorResponse::for_status(
            400,
            "bad cursor",
            error_types::VALIDATION_ERROR,
            error_codes::INVALID_PAGING_STATE,
        );
        let json = serde_json::to_value(&error).unwrap();

        assert_eq!(json["error"], "Bad Request");
        assert_eq!(json["code"], "INVALID_PAGING_STATE");
        assert_eq!(json["error_type"], "validation_error");
        assert!(json["timestamp"].is_string());
        assert_eq!(json.as_object().map(|o| o.len()), Some(6));
    }
}
