use crate::state::AppState;
use actix_web::{web, HttpResponse};
use error_types::{error_codes, error_types as kinds, ErrorResponse};
use serde_json::json;

const SERVICE_NAME: &str = "message-store-service";

/// Liveness: the process is up and serving HTTP.
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness: the message store answers a round trip.
pub async fn readiness(state: web::Data<AppState>) -> HttpResponse {
    match state.messages.ready().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ready",
            "service": SERVICE_NAME,
        })),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            HttpResponse::ServiceUnavailable().json(ErrorResponse::for_status(
                503,
                &format!("message store unavailable: {e}"),
                kinds::SERVICE_UNAVAILABLE_ERROR,
                error_codes::SERVICE_UNAVAILABLE,
            ))
        }
    }
}
