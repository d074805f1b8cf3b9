use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use message_store_service::config::{Config, CorsConfig, StoreBackend};
use message_store_service::repository::{
    InMemoryMessageRepository, MessageRepository, ScyllaMessageRepository,
};
use message_store_service::services::MessageService;
use message_store_service::state::AppState;
use message_store_service::{db, handlers, logging, AppError};
use std::io;
use std::sync::Arc;

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn build_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default();
    for origin in config.allowed_origins.split(',') {
        let origin = origin.trim();
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else if !origin.is_empty() {
            cors = cors.allowed_origin(origin);
        }
    }
    cors.allow_any_method().allow_any_header().max_age(3600)
}

async fn build_repository(config: &Config) -> Result<Arc<dyn MessageRepository>, AppError> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory message store, data will not survive a restart");
            Ok(Arc::new(InMemoryMessageRepository::new()))
        }
        StoreBackend::Scylla => {
            let session = db::connect(&config.scylla).await?;
            db::ensure_schema(&session, &config.scylla).await?;

            let repo = ScyllaMessageRepository::new(
                session,
                &config.scylla.keyspace,
                config.scylla.request_timeout(),
            )
            .await?;
            Ok(Arc::new(repo))
        }
    }
}

/// Message Store Service
///
/// Stores chat messages in ScyllaDB / Cassandra and serves them over HTTP
/// with cursor-based pagination.
#[actix_web::main]
async fn main() -> io::Result<()> {
    logging::init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            return Err(io::Error::new(io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    tracing::info!(
        "Starting message-store-service v{} ({:?} backend)",
        env!("CARGO_PKG_VERSION"),
        config.store_backend
    );

    let repository = match build_repository(&config).await {
        Ok(repo) => repo,
        Err(e) => {
            tracing::error!("Message store initialization failed: {}", e);
            return Err(io::Error::new(io::ErrorKind::Other, e.to_string()));
        }
    };

    let state = web::Data::new(AppState::new(MessageService::new(repository)));
    let cors_config = config.cors.clone();
    let bind_address = config.bind_address();

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(build_cors(&cors_config))
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure_routes)
    })
    .disable_signals()
    .shutdown_timeout(config.app.shutdown_grace_secs);

    if let Some(workers) = config.app.workers {
        server = server.workers(workers);
    }

    let server = server.bind(&bind_address)?.run();
    tracing::info!("HTTP server listening on {}", bind_address);

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let result = tokio::select! {
        res = server_task => {
            match res {
                Ok(inner) => inner,
                Err(e) => Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
            }
        }
        _ = &mut shutdown => {
            tracing::info!(
                grace = ?config.shutdown_grace(),
                "Shutdown signal received, draining in-flight requests"
            );
            server_handle.stop(true).await;
            Ok(())
        }
    };

    // The server owned the last handles to the store; the session is closed
    // once the workers have exited.
    tracing::info!("message-store-service shut down");
    result
}
