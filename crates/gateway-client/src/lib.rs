//! # gateway-client: Typed clients for the services behind the gateway
//!
//! Provides typed, timeout-bounded access to:
//! - **user-service**: create and delete primary user records
//! - **auth-service**: register and delete credentials
//! - **health**: `/actuator/health` of auth, user, order and payment services
//!
//! ## Contract
//!
//! Every operation is one outbound call with its own timeout, the scope
//! headers attached via [`headers::ScopedRequest`], and a typed result or a
//! [`DownstreamError`]. Calls are never retried; the sagas in `gateway-api`
//! decide what happens after a failure.
//!
//! ## Path Convention
//!
//! Endpoint paths are appended to the configured base URL, keeping any path
//! prefix the base carries: `http://user-service:8081` + `/api/internal/users/`.

pub mod auth;
pub mod config;
pub mod error;
pub mod headers;
pub mod health;
pub mod types;
pub mod users;

pub use auth::AuthServiceClient;
pub use config::{ConfigError, GatewayClientConfig};
pub use error::{ClientError, DownstreamError, DownstreamErrorKind};
pub use health::{HealthProbe, HealthReport};
pub use types::{NewUser, Role, TokenPair, UserId, UserRecord};
pub use users::UserServiceClient;

use gateway_core::RequestScope;
use serde::de::DeserializeOwned;
use url::Url;

/// Top-level client. Holds one sub-client per downstream concern; cloning is
/// cheap (the underlying connection pool is shared).
#[derive(Debug, Clone)]
pub struct GatewayClient {
    users: UserServiceClient,
    auth: AuthServiceClient,
    health: Vec<HealthProbe>,
}

impl GatewayClient {
    /// Create a client from configuration.
    pub fn new(config: GatewayClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.request_timeout)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            users: UserServiceClient::new(
                http.clone(),
                config.user_service_url.clone(),
                config.request_timeout,
            ),
            auth: AuthServiceClient::new(
                http.clone(),
                config.auth_service_url.clone(),
                config.request_timeout,
            ),
            health: vec![
                HealthProbe::new("authservice", http.clone(), config.auth_service_url, config.health_timeout),
                HealthProbe::new("userservice", http.clone(), config.user_service_url, config.health_timeout),
                HealthProbe::new("orderservice", http.clone(), config.order_service_url, config.health_timeout),
                HealthProbe::new("paymentservice", http, config.payment_service_url, config.health_timeout),
            ],
        })
    }

    /// Access the user-service client.
    pub fn users(&self) -> &UserServiceClient {
        &self.users
    }

    /// Access the auth-service client.
    pub fn auth(&self) -> &AuthServiceClient {
        &self.auth
    }

    /// Probe every backend concurrently and collect their statuses.
    pub async fn health_report(&self, scope: &RequestScope) -> HealthReport {
        health::probe_all(&self.health, scope).await
    }
}

/// Join a base URL and an endpoint path without `Url::join` segment
/// replacement surprises.
pub(crate) fn endpoint_url(base: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Send a request and decode a JSON success body.
pub(crate) async fn send_json<T: DeserializeOwned>(
    endpoint: &str,
    request: reqwest::RequestBuilder,
) -> Result<T, DownstreamError> {
    let resp = send(endpoint, request).await?;
    resp.json().await.map_err(|e| DownstreamError::Malformed {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}

/// Send a request whose success body is ignored.
pub(crate) async fn send_bodiless(
    endpoint: &str,
    request: reqwest::RequestBuilder,
) -> Result<(), DownstreamError> {
    send(endpoint, request).await.map(drop)
}

async fn send(
    endpoint: &str,
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, DownstreamError> {
    let resp = request
        .send()
        .await
        .map_err(|e| DownstreamError::from_transport(endpoint, e))?;

    if !resp.status().is_success() {
        let err = DownstreamError::from_status(endpoint, resp).await;
        tracing::debug!(endpoint, error = %err, "downstream call failed");
        return Err(err);
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_joins_without_double_slash() {
        let base: Url = "http://127.0.0.1:9000".parse().unwrap();
        assert_eq!(
            endpoint_url(&base, "/api/internal/users/"),
            "http://127.0.0.1:9000/api/internal/users/"
        );
    }

    #[test]
    fn endpoint_url_keeps_base_path() {
        let base: Url = "http://gateway.local/user-service".parse().unwrap();
        assert_eq!(
            endpoint_url(&base, "api/internal/users/7"),
            "http://gateway.local/user-service/api/internal/users/7"
        );
    }

    #[test]
    fn client_builds_from_local_mock_config() {
        let client = GatewayClient::new(GatewayClientConfig::local_mock(19000).unwrap()).unwrap();
        assert_eq!(client.health.len(), 4);
    }
}
