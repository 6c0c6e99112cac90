//! # Custom Extractors
//!
//! Provides the [`Scope`] extractor and [`extract_json`], which maps JSON
//! body rejections to a `400` error envelope. Field rules are checked by the
//! saga that consumes the body, not here.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::Json;
use gateway_core::RequestScope;

use crate::error::AppError;

/// The [`RequestScope`] bound by the correlation middleware, available to
/// handlers via Axum's `FromRequestParts`.
///
/// Returns a 500 if no scope is bound (the middleware did not run).
#[derive(Debug, Clone)]
pub struct Scope(pub RequestScope);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Scope {
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        RequestScope::current()
            .map(Scope)
            .ok_or_else(|| AppError::Internal("no request scope bound".into()))
    }
}

/// Extract a JSON body, mapping deserialization errors to a 400.
///
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::validation(err.body_text()))
}
