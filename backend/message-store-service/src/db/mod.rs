//! Cluster connection and schema bootstrap.

pub mod schema;

use crate::config::ScyllaConfig;
use crate::error::AppError;
use resilience::{with_retry, with_timeout, RetryConfig};
use scylla::statement::Consistency;
use scylla::{ExecutionProfile, Session, SessionBuilder};
use std::sync::Arc;
use tracing::info;

/// Open a session, retrying while the cluster comes up.
///
/// Every statement on the session runs at QUORUM with the configured request
/// timeout unless it overrides its execution profile.
pub async fn connect(config: &ScyllaConfig) -> Result<Arc<Session>, AppError> {
    let profile = ExecutionProfile::builder()
        .consistency(Consistency::Quorum)
        .request_timeout(Some(config.request_timeout()))
        .build();

    let builder = SessionBuilder::new()
        .known_nodes(&config.hosts)
        .connection_timeout(config.request_timeout())
        .default_execution_profile_handle(profile.into_handle());

    let retry = RetryConfig::fixed(config.connect_max_attempts, config.connect_backoff());

    info!(
        hosts = ?config.hosts,
        max_attempts = config.connect_max_attempts,
        "Connecting to Scylla cluster"
    );

    let session = with_retry(&retry, "scylla_connect", || builder.build())
        .await
        .map_err(|e| {
            AppError::Database(format!(
                "could not connect to {:?}: {}",
                config.hosts,
                e.into_last_error()
            ))
        })?;

    info!("Connected to Scylla cluster");
    Ok(Arc::new(session))
}

/// Create the keyspace and table if they are missing, then wait for every
/// node to agree on the schema.
pub async fn ensure_schema(session: &Session, config: &ScyllaConfig) -> Result<(), AppError> {
    let statements = [
        schema::create_keyspace(&config.keyspace, config.replication_factor),
        schema::create_messages_table(&config.keyspace),
    ];

    for ddl in statements {
        with_timeout(config.request_timeout(), session.query(ddl, ()))
            .await
            .map_err(|e| AppError::Timeout(e.0))?
            .map_err(|e| AppError::Database(format!("schema setup failed: {e}")))?;
    }

    with_timeout(config.request_timeout(), session.await_schema_agreement())
        .await
        .map_err(|e| AppError::Timeout(e.0))?
        .map_err(|e| AppError::Database(format!("schema agreement failed: {e}")))?;

    info!(keyspace = %config.keyspace, "Schema ready");
    Ok(())
}
