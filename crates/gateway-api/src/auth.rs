//! # Authentication Gate
//!
//! Decides, per inbound request, whether it may proceed and with which
//! credential forwarded downstream:
//!
//! | Request | Decision | Effect |
//! |---------|----------|--------|
//! | `OPTIONS *` | [`AuthDecision::Bypass`] | `200`, nothing downstream |
//! | allow-listed path | [`AuthDecision::InternalCallHeaders`] | proceeds without a credential |
//! | `Authorization: Bearer <token>` | [`AuthDecision::Forward`] | proceeds, token forwarded |
//! | anything else | [`AuthDecision::Reject`] | `401` envelope, nothing downstream |
//!
//! The gate never validates the token itself; downstream services do.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use gateway_core::{BearerCredential, RequestScope};

use crate::error::AppError;

const BEARER_PREFIX: &str = "Bearer ";

// ── Decision ────────────────────────────────────────────────────────────────

/// Outcome of the gate for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    /// Preflight request, answered immediately.
    Bypass,
    /// Public path: proceeds with only the internal-call headers.
    InternalCallHeaders,
    /// Proceeds with the caller's credential forwarded downstream.
    Forward(BearerCredential),
    /// Rejected with `401` and the given reason.
    Reject(String),
}

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Gate configuration injected into request extensions.
#[derive(Debug, Clone, Default)]
pub struct AuthGateConfig {
    public_paths: Arc<Vec<String>>,
}

impl AuthGateConfig {
    pub fn new(public_paths: impl IntoIterator<Item = String>) -> Self {
        Self {
            public_paths: Arc::new(public_paths.into_iter().collect()),
        }
    }

    /// Whether `path` equals an allow-listed entry or lies beneath one.
    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths.iter().any(|entry| {
            path == entry
                || path
                    .strip_prefix(entry.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    /// Classify a request.
    pub fn decide(
        &self,
        method: &Method,
        path: &str,
        authorization: Option<&HeaderValue>,
    ) -> AuthDecision {
        if method == Method::OPTIONS {
            return AuthDecision::Bypass;
        }
        if self.is_public(path) {
            return AuthDecision::InternalCallHeaders;
        }
        match parse_bearer(authorization) {
            Ok(credential) => AuthDecision::Forward(credential),
            Err(reason) => AuthDecision::Reject(reason.to_string()),
        }
    }
}

/// Extract the bearer token from an `Authorization` header value.
fn parse_bearer(authorization: Option<&HeaderValue>) -> Result<BearerCredential, &'static str> {
    let value = authorization.ok_or("missing authorization header")?;
    let value = value
        .to_str()
        .map_err(|_| "malformed authorization header")?;
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or("authorization header must use Bearer scheme")?;

    if token.is_empty() {
        return Err("empty bearer token");
    }
    if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err("malformed bearer token");
    }
    Ok(BearerCredential::new(token))
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Apply the gate. Must run inside the correlation middleware: a forwarded
/// credential is attached by re-binding the current [`RequestScope`].
pub async fn auth_gate(request: Request, next: Next) -> Response {
    let config = request
        .extensions()
        .get::<AuthGateConfig>()
        .cloned()
        .unwrap_or_default();

    let decision = config.decide(
        request.method(),
        request.uri().path(),
        request.headers().get(header::AUTHORIZATION),
    );

    match decision {
        AuthDecision::Bypass => StatusCode::OK.into_response(),
        AuthDecision::InternalCallHeaders => next.run(request).await,
        AuthDecision::Forward(credential) => match RequestScope::current() {
            Some(scope) => scope.with_credential(credential).scope(next.run(request)).await,
            None => AppError::Internal("auth gate ran without a request scope".into()).into_response(),
        },
        AuthDecision::Reject(reason) => {
            tracing::warn!(path = %request.uri().path(), %reason, "authentication failed");
            AppError::Unauthorized(reason).into_response()
        }
    }
}
