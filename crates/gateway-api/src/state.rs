//! # Application State
//!
//! Shared, read-only state for the Axum application: gateway configuration
//! and the downstream clients. Cloning is cheap.

use gateway_client::GatewayClient;
use gateway_core::DEFAULT_ORIGIN_SERVICE;

use crate::saga::{DeletionSaga, RegistrationSaga};

/// Paths that pass the gate without a credential.
pub const DEFAULT_PUBLIC_PATHS: &[&str] = &[
    "/register",
    "/login",
    "/auth",
    "/swagger-ui",
    "/swagger-resources",
    "/api-docs",
    "/webjars",
];

/// Gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Service tag sent downstream as `X-Source-Service`.
    pub service_name: String,
    /// Path prefixes exempt from credential checks.
    pub public_paths: Vec<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// - `GATEWAY_SERVICE_NAME` (default `GATEWAY`)
    /// - `GATEWAY_PUBLIC_PATHS`: comma-separated path prefixes (default
    ///   [`DEFAULT_PUBLIC_PATHS`])
    pub fn from_env() -> Self {
        let service_name = std::env::var("GATEWAY_SERVICE_NAME")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_ORIGIN_SERVICE.to_string());

        let public_paths = match std::env::var("GATEWAY_PUBLIC_PATHS") {
            Ok(raw) => parse_public_paths(&raw),
            Err(_) => default_public_paths(),
        };

        Self {
            service_name,
            public_paths,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_ORIGIN_SERVICE.to_string(),
            public_paths: default_public_paths(),
        }
    }
}

fn default_public_paths() -> Vec<String> {
    DEFAULT_PUBLIC_PATHS.iter().map(|p| p.to_string()).collect()
}

/// Parse a comma-separated path list. Blank entries are dropped, a leading
/// `/` is added where missing and trailing slashes are removed.
pub fn parse_public_paths(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("/{}", p.trim_matches('/')))
        .collect()
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub clients: GatewayClient,
}

impl AppState {
    /// Create state from configuration and downstream clients.
    pub fn new(config: AppConfig, clients: GatewayClient) -> Self {
        Self { config, clients }
    }

    /// The registration saga over this state's clients.
    pub fn registration_saga(&self) -> RegistrationSaga {
        RegistrationSaga::new(self.clients.users().clone(), self.clients.auth().clone())
    }

    /// The deletion saga over this state's clients.
    pub fn deletion_saga(&self) -> DeletionSaga {
        DeletionSaga::new(self.clients.users().clone(), self.clients.auth().clone())
    }
}
