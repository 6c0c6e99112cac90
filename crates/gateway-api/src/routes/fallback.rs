//! # Service Fallbacks
//!
//! `GET /fallback/:service` answers on behalf of a backend that is down.

use axum::extract::Path;
use axum::routing::get;
use axum::Router;

use crate::error::AppError;
use crate::state::AppState;

/// Build the fallback router.
pub fn router() -> Router<AppState> {
    Router::new().route("/fallback/:service", get(fallback))
}

/// Display name of a backend with a fallback route.
pub fn service_display_name(service: &str) -> Option<&'static str> {
    match service {
        "user" => Some("User"),
        "order" => Some("Order"),
        "auth" => Some("Authentication"),
        "payment" => Some("Payment"),
        _ => None,
    }
}

/// GET /fallback/:service: `503` envelope for a known backend.
async fn fallback(Path(service): Path<String>) -> AppError {
    match service_display_name(&service) {
        Some(name) => AppError::ServiceUnavailable(format!(
            "{name} Service is unavailable. Please try again later."
        )),
        None => AppError::NotFound(format!("no fallback for service '{service}'")),
    }
}
