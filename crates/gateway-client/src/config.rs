//! Downstream service configuration.
//!
//! Base URLs for each backend and the per-call timeouts. Defaults point at
//! a local docker-compose layout. Override via environment variables or
//! explicit construction for tests.

use std::time::Duration;

use url::Url;

/// Default timeout for saga calls (create, register, delete).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Default timeout for a single health probe.
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_millis(2_000);

/// Configuration for connecting to the services behind the gateway.
#[derive(Debug, Clone)]
pub struct GatewayClientConfig {
    /// Base URL for user-service (primary user records).
    pub user_service_url: Url,
    /// Base URL for auth-service (credentials and tokens).
    pub auth_service_url: Url,
    /// Base URL for order-service. Only probed for health.
    pub order_service_url: Url,
    /// Base URL for payment-service. Only probed for health.
    pub payment_service_url: Url,
    /// Timeout applied to each saga call independently.
    pub request_timeout: Duration,
    /// Timeout applied to each health probe independently.
    pub health_timeout: Duration,
}

impl GatewayClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `USER_SERVICE_URL` (default: `http://localhost:8081`)
    /// - `AUTH_SERVICE_URL` (default: `http://localhost:8082`)
    /// - `ORDER_SERVICE_URL` (default: `http://localhost:8083`)
    /// - `PAYMENT_SERVICE_URL` (default: `http://localhost:8084`)
    /// - `DOWNSTREAM_TIMEOUT_MS` (default: 5000)
    /// - `HEALTH_TIMEOUT_MS` (default: 2000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            user_service_url: env_url("USER_SERVICE_URL", "http://localhost:8081")?,
            auth_service_url: env_url("AUTH_SERVICE_URL", "http://localhost:8082")?,
            order_service_url: env_url("ORDER_SERVICE_URL", "http://localhost:8083")?,
            payment_service_url: env_url("PAYMENT_SERVICE_URL", "http://localhost:8084")?,
            request_timeout: env_millis("DOWNSTREAM_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT)?,
            health_timeout: env_millis("HEALTH_TIMEOUT_MS", DEFAULT_HEALTH_TIMEOUT)?,
        })
    }

    /// Create a configuration pointing at local mock servers on consecutive
    /// ports: user, auth, order, payment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if a localhost URL cannot be parsed.
    pub fn local_mock(base_port: u16) -> Result<Self, ConfigError> {
        let make_url = |port: u16| -> Result<Url, ConfigError> {
            Url::parse(&format!("http://127.0.0.1:{port}"))
                .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))
        };
        Ok(Self {
            user_service_url: make_url(base_port)?,
            auth_service_url: make_url(base_port + 1)?,
            order_service_url: make_url(base_port + 2)?,
            payment_service_url: make_url(base_port + 3)?,
            request_timeout: Duration::from_secs(2),
            health_timeout: Duration::from_millis(500),
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn env_millis(var: &str, default: Duration) -> Result<Duration, ConfigError> {
    match std::env::var(var) {
        Err(_) => Ok(default),
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(0) | Err(_) => Err(ConfigError::InvalidTimeout(var.to_string(), raw)),
            Ok(ms) => Ok(Duration::from_millis(ms)),
        },
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid timeout for {0}: {1:?} (expected a positive number of milliseconds)")]
    InvalidTimeout(String, String),
}
