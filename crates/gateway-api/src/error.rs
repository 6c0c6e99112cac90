//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps validation, authentication, saga, and downstream failures to HTTP
//! status codes and renders every one of them as an [`ErrorEnvelope`].
//! Never exposes internal error details in responses.
//!
//! | Variant | Status |
//! |---------|--------|
//! | `Validation` | 400 |
//! | `Unauthorized` | 401 |
//! | `Forbidden` | 403 |
//! | `NotFound` | 404 |
//! | `RolledBack` | 400 |
//! | `ServiceUnavailable` | 503 |
//! | `Relayed` | the downstream 4xx status |
//! | `Internal` | 500 |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gateway_client::DownstreamError;
use gateway_core::{ErrorEnvelope, FieldErrors, RequestScope};
use thiserror::Error;

/// Message of a field-validation failure.
pub const VALIDATION_FAILED: &str = "Validation failed";

/// Message returned in place of any internal error detail.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request validation failed (400). `field_errors` is present for
    /// per-field failures.
    #[error("validation error: {message}")]
    Validation {
        message: String,
        field_errors: Option<FieldErrors>,
    },

    /// Authentication failure: missing or malformed credential (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authorization failure: insufficient permissions (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A downstream service reported the resource as missing (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// A saga step failed after its compensation ran (400).
    #[error("rolled back: {0}")]
    RolledBack(String),

    /// A downstream service could not be reached (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// A downstream client error carrying its own envelope, relayed as-is.
    #[error("downstream rejected request: {} ({})", .0.message, .0.status_code)]
    Relayed(ErrorEnvelope),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// A validation failure without per-field detail.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field_errors: None,
        }
    }

    /// A per-field validation failure.
    pub fn invalid_fields(field_errors: FieldErrors) -> Self {
        Self::Validation {
            message: VALIDATION_FAILED.to_string(),
            field_errors: Some(field_errors),
        }
    }

    /// Return the HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::RolledBack(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Relayed(envelope) => {
                StatusCode::from_u16(envelope.status_code).unwrap_or(StatusCode::BAD_REQUEST)
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the envelope for the request at `url`.
    fn envelope(self, url: &str) -> ErrorEnvelope {
        let status = self.status().as_u16();
        match self {
            Self::Validation {
                message,
                field_errors,
            } => ErrorEnvelope::new(message, status, url)
                .with_field_errors(field_errors.unwrap_or_default()),
            Self::Relayed(mut envelope) => {
                envelope.status_code = status;
                envelope.url = url.to_string();
                envelope
            }
            Self::Internal(_) => ErrorEnvelope::new(INTERNAL_ERROR_MESSAGE, status, url),
            Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::RolledBack(message)
            | Self::ServiceUnavailable(message) => ErrorEnvelope::new(message, status, url),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let url = RequestScope::current()
            .map(|scope| scope.url().to_string())
            .unwrap_or_default();

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request failed");
        }

        (status, Json(self.envelope(&url))).into_response()
    }
}

/// Translate a downstream failure into an API error.
///
/// `NotFound` → 404, `Unreachable` → 503. A downstream 4xx whose body is an
/// error envelope is relayed with its status; everything else is a 500.
impl From<DownstreamError> for AppError {
    fn from(err: DownstreamError) -> Self {
        match &err {
            DownstreamError::NotFound { .. } => {
                tracing::warn!(error = %err, "downstream resource not found");
                Self::NotFound("Resource not found".to_string())
            }
            DownstreamError::Unreachable { .. } => {
                tracing::warn!(error = %err, "downstream service unreachable");
                Self::ServiceUnavailable(
                    "Service is unavailable. Please try again later.".to_string(),
                )
            }
            DownstreamError::Other {
                status: Some(status),
                body: Some(body),
                ..
            } if (400..500).contains(status) => match ErrorEnvelope::from_downstream_body(body) {
                Some(mut envelope) => {
                    tracing::info!(error = %err, "relaying downstream client error");
                    envelope.status_code = *status;
                    Self::Relayed(envelope)
                }
                None => Self::Internal(err.to_string()),
            },
            DownstreamError::Malformed { .. } | DownstreamError::Other { .. } => {
                Self::Internal(err.to_string())
            }
        }
    }
}
