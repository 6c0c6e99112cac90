//! Error types for downstream calls.
//!
//! Every outbound call resolves to a typed result or one of four
//! [`DownstreamError`] kinds. Transport error types from `reqwest` never
//! leave this crate, so callers match on a closed set.

use crate::config::ConfigError;

/// Which of the four failure kinds a [`DownstreamError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownstreamErrorKind {
    NotFound,
    Unreachable,
    Malformed,
    Other,
}

/// Failure of a single downstream call.
///
/// Each variant carries the endpoint that failed and the triggering message
/// text for diagnostics.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DownstreamError {
    /// The downstream service answered 404.
    #[error("{endpoint}: not found: {message}")]
    NotFound { endpoint: String, message: String },

    /// The service could not be reached: connection refused, DNS failure,
    /// or the per-call timeout elapsed.
    #[error("{endpoint}: service unreachable: {message}")]
    Unreachable { endpoint: String, message: String },

    /// The service answered with a success status but the body could not be
    /// decoded into the expected type.
    #[error("{endpoint}: malformed response: {message}")]
    Malformed { endpoint: String, message: String },

    /// Any other failure. `status` and `body` are present when the service
    /// answered with a non-success status.
    #[error("{endpoint}: {message}")]
    Other {
        endpoint: String,
        status: Option<u16>,
        message: String,
        body: Option<String>,
    },
}

impl DownstreamError {
    /// Classify a transport-level failure.
    pub(crate) fn from_transport(endpoint: impl Into<String>, err: reqwest::Error) -> Self {
        let endpoint = endpoint.into();
        let message = err.to_string();
        if err.is_connect() || err.is_timeout() {
            Self::Unreachable { endpoint, message }
        } else if err.is_decode() {
            Self::Malformed { endpoint, message }
        } else {
            Self::Other {
                endpoint,
                status: err.status().map(|s| s.as_u16()),
                message,
                body: None,
            }
        }
    }

    /// Classify a non-success response, consuming its body.
    pub(crate) async fn from_status(endpoint: impl Into<String>, resp: reqwest::Response) -> Self {
        let endpoint = endpoint.into();
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let message = format!("HTTP {status}");
        if status == reqwest::StatusCode::NOT_FOUND {
            Self::NotFound { endpoint, message }
        } else {
            Self::Other {
                endpoint,
                status: Some(status.as_u16()),
                message,
                body: (!body.is_empty()).then_some(body),
            }
        }
    }

    /// Failure kind, for callers that only need to branch on the category.
    pub fn kind(&self) -> DownstreamErrorKind {
        match self {
            Self::NotFound { .. } => DownstreamErrorKind::NotFound,
            Self::Unreachable { .. } => DownstreamErrorKind::Unreachable,
            Self::Malformed { .. } => DownstreamErrorKind::Malformed,
            Self::Other { .. } => DownstreamErrorKind::Other,
        }
    }

    /// The endpoint that failed, e.g. `POST /api/internal/users/`.
    pub fn endpoint(&self) -> &str {
        match self {
            Self::NotFound { endpoint, .. }
            | Self::Unreachable { endpoint, .. }
            | Self::Malformed { endpoint, .. }
            | Self::Other { endpoint, .. } => endpoint,
        }
    }

    /// The triggering message text.
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound { message, .. }
            | Self::Unreachable { message, .. }
            | Self::Malformed { message, .. }
            | Self::Other { message, .. } => message,
        }
    }

    /// HTTP status the downstream service answered with, when it answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Other { status, .. } => *status,
            Self::Unreachable { .. } | Self::Malformed { .. } => None,
        }
    }

    /// Raw response body of a non-success answer, if one was returned.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Other { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}

/// Errors building a [`crate::GatewayClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}
