//! # User Deletion API
//!
//! `DELETE /users/internal-delete/:id` removes a user from user-service and
//! auth-service. Requires a bearer credential, which is forwarded.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::routing::delete;
use axum::{Json, Router};
use gateway_client::{UserId, UserRecord};

use crate::error::AppError;
use crate::extractors::Scope;
use crate::state::AppState;

/// Build the user deletion router.
pub fn router() -> Router<AppState> {
    Router::new().route("/users/internal-delete/:id", delete(delete_user))
}

/// DELETE /users/internal-delete/:id: Delete a user everywhere.
async fn delete_user(
    State(state): State<AppState>,
    Scope(scope): Scope,
    id: Result<Path<UserId>, PathRejection>,
) -> Result<Json<UserRecord>, AppError> {
    let Path(id) = id.map_err(|e| AppError::validation(format!("invalid user id: {}", e.body_text())))?;
    let record = state.deletion_saga().run(&scope, id).await?;
    Ok(Json(record))
}
