//! Resilience patterns shared by Nova services
//!
//! - **Retry**: bounded attempts with a fixed backoff
//! - **Timeout**: enforces a deadline on an async operation
//!
//! # Example: connect with a fixed one second backoff
//!
//! ```rust,no_run
//! use resilience::{with_retry, RetryConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = RetryConfig::fixed(60, Duration::from_secs(1));
//!
//!     let _result = with_retry(&config, "connect", || async {
//!         // Your connection attempt here
//!         Ok::<_, String>(())
//!     })
//!     .await;
//! }
//! ```

pub mod retry;
pub mod timeout;

pub use retry::{with_retry, RetryConfig, RetryError};
pub use timeout::{with_timeout, TimeoutError};
