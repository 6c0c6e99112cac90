//! Typed client for auth-service (credentials and tokens).
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/auth/register` | Register credentials, returns a token pair |
//! | DELETE | `/api/internal/auth/user/{id}` | Delete credentials (bodiless) |

use std::time::Duration;

use gateway_core::RequestScope;
use url::Url;

use crate::error::DownstreamError;
use crate::headers::ScopedRequest;
use crate::types::{NewUser, TokenPair, UserId};

/// Client for auth-service.
#[derive(Debug, Clone)]
pub struct AuthServiceClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl AuthServiceClient {
    pub(crate) fn new(http: reqwest::Client, base_url: Url, timeout: Duration) -> Self {
        Self {
            http,
            base_url,
            timeout,
        }
    }

    /// Register credentials for a user.
    ///
    /// Calls `POST {base_url}/auth/register` with the same canonical body
    /// sent to user-service.
    pub async fn register(
        &self,
        scope: &RequestScope,
        user: &NewUser,
    ) -> Result<TokenPair, DownstreamError> {
        let endpoint = "POST /auth/register";
        let url = crate::endpoint_url(&self.base_url, "/auth/register");

        let request = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .scoped(scope)
            .json(user);
        crate::send_json(endpoint, request).await
    }

    /// Delete the credentials of a user. The response body is ignored.
    ///
    /// Calls `DELETE {base_url}/api/internal/auth/user/{id}`.
    pub async fn delete_credentials(
        &self,
        scope: &RequestScope,
        id: UserId,
    ) -> Result<(), DownstreamError> {
        let endpoint = format!("DELETE /api/internal/auth/user/{id}");
        let url = crate::endpoint_url(&self.base_url, &format!("/api/internal/auth/user/{id}"));

        let request = self.http.delete(&url).timeout(self.timeout).scoped(scope);
        crate::send_bodiless(&endpoint, request).await
    }
}
