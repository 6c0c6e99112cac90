//! # gateway-api: Axum Gateway in Front of the User Platform Services
//!
//! Terminates client requests, propagates a correlation id to every
//! downstream call, gates requests on a bearer credential, and runs the
//! multi-service registration and deletion operations.
//!
//! ## API Surface
//!
//! | Route | Module | Gate |
//! |-------|--------|------|
//! | `POST /register` | [`routes::registration`] | public |
//! | `DELETE /users/internal-delete/:id` | [`routes::users`] | bearer |
//! | `GET /actuators/health` | [`routes::actuators`] | bearer |
//! | `GET /fallback/:service` | [`routes::fallback`] | bearer |
//! | `GET /health/liveness`, `/health/readiness` | here | none |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! Correlation → TraceLayer → AuthGate → Handler
//! ```
//!
//! Correlation wraps everything, including the health probes and unknown
//! routes, so every response echoes `X-Request-Id`.

pub mod auth;
pub mod correlation;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod saga;
pub mod state;

use axum::http::Uri;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;

use crate::auth::AuthGateConfig;
use crate::correlation::OriginService;
use crate::error::AppError;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the auth gate so they
/// remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let gate = AuthGateConfig::new(state.config.public_paths.clone());
    let origin = OriginService::new(state.config.service_name.as_str());

    // Gated routes.
    let api = Router::new()
        .merge(routes::registration::router())
        .merge(routes::users::router())
        .merge(routes::actuators::router())
        .merge(routes::fallback::router())
        .fallback(not_found)
        .layer(from_fn(auth::auth_gate));

    // Unauthenticated health probes.
    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new()
        .merge(health)
        .merge(api)
        .layer(middleware::tracing_layer::layer())
        .layer(from_fn(correlation::correlation_middleware))
        .layer(axum::Extension(gate))
        .layer(axum::Extension(origin))
        .with_state(state)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}

/// Envelope for requests that match no route.
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}
