/// Configuration management for Message Store Service
///
/// Values come from the process environment; a `.env` file in the working
/// directory is loaded first when present.
use crate::error::AppError;
use std::str::FromStr;
use std::time::Duration;

/// CQL native protocol port used when an endpoint has none.
pub const DEFAULT_CQL_PORT: u16 = 9042;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Cluster and schema settings
    pub scylla: ScyllaConfig,
    /// Which repository implementation backs the service
    pub store_backend: StoreBackend,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Worker threads; actix picks one per core when unset
    pub workers: Option<usize>,
    /// How long in-flight requests may run after a shutdown signal
    pub shutdown_grace_secs: u64,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins, `*` for any
    pub allowed_origins: String,
}

#[derive(Debug, Clone)]
pub struct ScyllaConfig {
    /// Contact points as `host:port`
    pub hosts: Vec<String>,
    pub keyspace: String,
    pub replication_factor: u32,
    pub connect_max_attempts: u32,
    pub connect_backoff_ms: u64,
    pub request_timeout_secs: u64,
}

impl ScyllaConfig {
    pub fn connect_backoff(&self) -> Duration {
        Duration::from_millis(self.connect_backoff_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ScyllaConfig {
    fn default() -> Self {
        Self {
            hosts: vec![format!("localhost:{DEFAULT_CQL_PORT}")],
            keyspace: "messaging_keyspace".to_string(),
            replication_factor: 1,
            connect_max_attempts: 60,
            connect_backoff_ms: 1_000,
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Scylla,
    /// Process-local map, data is lost on restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scylla" | "cassandra" => Ok(StoreBackend::Scylla),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let defaults = ScyllaConfig::default();
        let hosts = parse_hosts(&env_or("HOSTS", "localhost"));
        if hosts.is_empty() {
            return Err(AppError::Config("HOSTS must list at least one endpoint".into()));
        }

        let keyspace = env_or("SCYLLA_KEYSPACE", &defaults.keyspace);
        validate_keyspace(&keyspace)?;

        let replication_factor =
            parse_env_or_default("SCYLLA_REPLICATION_FACTOR", defaults.replication_factor)?;
        if replication_factor == 0 {
            return Err(AppError::Config(
                "SCYLLA_REPLICATION_FACTOR must be at least 1".into(),
            ));
        }

        let workers = match std::env::var("HTTP_WORKERS") {
            Ok(raw) => Some(parse_value::<usize>("HTTP_WORKERS", &raw)?),
            Err(_) => None,
        };

        Ok(Config {
            app: AppConfig {
                host: env_or("HOST", "0.0.0.0"),
                port: parse_env_or_default("PORT", 8080)?,
                workers,
                shutdown_grace_secs: parse_env_or_default("SHUTDOWN_GRACE_SECS", 10)?,
            },
            cors: CorsConfig {
                allowed_origins: env_or("CORS_ALLOWED_ORIGINS", "*"),
            },
            scylla: ScyllaConfig {
                hosts,
                keyspace,
                replication_factor,
                connect_max_attempts: parse_env_or_default(
                    "SCYLLA_CONNECT_MAX_ATTEMPTS",
                    defaults.connect_max_attempts,
                )?,
                connect_backoff_ms: parse_env_or_default(
                    "SCYLLA_CONNECT_BACKOFF_MS",
                    defaults.connect_backoff_ms,
                )?,
                request_timeout_secs: parse_env_or_default(
                    "SCYLLA_REQUEST_TIMEOUT_SECS",
                    defaults.request_timeout_secs,
                )?,
            },
            store_backend: parse_env_or_default("MESSAGE_STORE_BACKEND", StoreBackend::Scylla)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.app.shutdown_grace_secs)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("Failed to parse {}='{}': {}", key, raw, e)))
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated endpoint list, adding the CQL port where missing.
pub fn parse_hosts(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|host| {
            if let Some(rest) = host.strip_prefix('[') {
                // bracketed IPv6 literal, port optional
                if rest.contains("]:") {
                    host.to_string()
                } else {
                    format!("{host}:{DEFAULT_CQL_PORT}")
                }
            } else if host.matches(':').count() > 1 {
                format!("[{host}]:{DEFAULT_CQL_PORT}")
            } else if host.contains(':') {
                host.to_string()
            } else {
                format!("{host}:{DEFAULT_CQL_PORT}")
            }
        })
        .collect()
}

/// The keyspace name is interpolated into CQL, so only plain identifiers pass.
fn validate_keyspace(keyspace: &str) -> Result<(), AppError> {
    let valid = !keyspace.is_empty()
        && keyspace.len() <= 48
        && keyspace.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && keyspace.chars().next().is_some_and(|c| c.is_ascii_alphabetic());

    if valid {
        Ok(())
    } else {
        Err(AppError::Config(format!(
            "SCYLLA_KEYSPACE '{keyspace}' is not a valid CQL identifier"
        )))
    }
}
