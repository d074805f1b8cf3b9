/// Message Store Service Library
///
/// Durable storage for chat messages on ScyllaDB / Cassandra, exposed over a
/// small JSON HTTP API with cursor-based pagination.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route table
/// - `models`: Message entity and request/response DTOs
/// - `services`: Validation and id/timestamp assignment in front of the store
/// - `repository`: Storage trait, Scylla and in-memory implementations, paging cursor
/// - `db`: Cluster connection with bounded retry and schema bootstrap
/// - `middleware`: Error to HTTP response mapping
/// - `error`: Error types
/// - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
