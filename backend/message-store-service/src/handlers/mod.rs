/// HTTP handlers for the message store
///
/// - Messages: create, list (whole table or paged), read, replace, delete
/// - Health: liveness and database readiness
pub mod health;
pub mod messages;

use crate::error::AppError;
use actix_web::web;

pub use health::{health, readiness};
pub use messages::{create_message, delete_message, get_message, list_messages, update_message};

/// Register all routes.
///
/// Extractor failures (bad JSON, malformed path ids, unparsable query
/// strings) are answered with the same error body as every other 400.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .route("/health", web::get().to(health))
    .route("/health/ready", web::get().to(readiness))
    .service(
        web::resource("/messages")
            .route(web::post().to(create_message))
            .route(web::get().to(list_messages)),
    )
    .service(
        web::resource("/messages/{id}")
            .route(web::get().to(get_message))
            .route(web::put().to(update_message))
            .route(web::delete().to(delete_message)),
    );
}
