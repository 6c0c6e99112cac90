//! # Registration API
//!
//! `POST /register` creates a user in user-service and its credentials in
//! auth-service. Public: passes the gate without a credential.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::error::AppError;
use crate::extractors::{extract_json, Scope};
use crate::saga::{Registration, RegistrationRequest};
use crate::state::AppState;

/// Build the registration router.
pub fn router() -> Router<AppState> {
    Router::new().route("/register", post(register))
}

/// POST /register: Register a user.
async fn register(
    State(state): State<AppState>,
    Scope(scope): Scope,
    body: Result<Json<RegistrationRequest>, JsonRejection>,
) -> Result<Json<Registration>, AppError> {
    // Field rules are checked once, inside the saga.
    let request = extract_json(body)?;
    let registration = state.registration_saga().run(&scope, request).await?;
    Ok(Json(registration))
}
