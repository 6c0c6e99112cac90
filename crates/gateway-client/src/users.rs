//! Typed client for user-service (primary user records).
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/api/internal/users/` | Create user record |
//! | DELETE | `/api/internal/users/{id}` | Delete user record, returns it |

use std::time::Duration;

use gateway_core::RequestScope;
use url::Url;

use crate::error::DownstreamError;
use crate::headers::ScopedRequest;
use crate::types::{NewUser, UserId, UserRecord};

/// Client for user-service.
#[derive(Debug, Clone)]
pub struct UserServiceClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl UserServiceClient {
    pub(crate) fn new(http: reqwest::Client, base_url: Url, timeout: Duration) -> Self {
        Self {
            http,
            base_url,
            timeout,
        }
    }

    /// Create a user record.
    ///
    /// Calls `POST {base_url}/api/internal/users/`.
    pub async fn create_user(
        &self,
        scope: &RequestScope,
        user: &NewUser,
    ) -> Result<UserRecord, DownstreamError> {
        let endpoint = "POST /api/internal/users/";
        let url = crate::endpoint_url(&self.base_url, "/api/internal/users/");

        let request = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .scoped(scope)
            .json(user);
        crate::send_json(endpoint, request).await
    }

    /// Delete a user record and return it.
    ///
    /// Calls `DELETE {base_url}/api/internal/users/{id}`.
    pub async fn delete_user(
        &self,
        scope: &RequestScope,
        id: UserId,
    ) -> Result<UserRecord, DownstreamError> {
        let endpoint = format!("DELETE /api/internal/users/{id}");
        let url = crate::endpoint_url(&self.base_url, &format!("/api/internal/users/{id}"));

        let request = self.http.delete(&url).timeout(self.timeout).scoped(scope);
        crate::send_json(&endpoint, request).await
    }
}
