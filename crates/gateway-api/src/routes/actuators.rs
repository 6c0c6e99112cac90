//! # Aggregated Health API
//!
//! `GET /actuators/health` reports the `/actuator/health` status of every
//! backend. Always `200`; an unreachable backend is reported as `DOWN`.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use gateway_client::HealthReport;

use crate::extractors::Scope;
use crate::state::AppState;

/// Build the actuators router.
pub fn router() -> Router<AppState> {
    Router::new().route("/actuators/health", get(health))
}

/// GET /actuators/health: Backend statuses keyed by service name.
async fn health(State(state): State<AppState>, Scope(scope): Scope) -> Json<HealthReport> {
    let report = state.clients.health_report(&scope).await;
    if !report.all_up() {
        tracing::warn!(?report, "one or more backends are not UP");
    }
    Json(report)
}
