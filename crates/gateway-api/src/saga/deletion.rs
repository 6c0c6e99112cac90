//! # Deletion Saga
//!
//! Deletes a user from user-service, then its credentials from auth-service.
//! There is no compensation: a failure after the first step leaves the
//! credentials in place and is reported as such.
//!
//! | Failure | Status |
//! |---------|--------|
//! | user-service answered 404 | 404 |
//! | connect failure or timeout on either step | 503 |
//! | anything else | 500 |

use gateway_client::{
    AuthServiceClient, DownstreamError, DownstreamErrorKind, UserId, UserRecord,
    UserServiceClient,
};
use gateway_core::RequestScope;
use thiserror::Error;

use crate::error::AppError;

/// The two steps of a deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionStep {
    UserRecord,
    Credentials,
}

impl DeletionStep {
    /// Display name of the service that owns this step.
    pub fn service_name(&self) -> &'static str {
        match self {
            Self::UserRecord => "User",
            Self::Credentials => "Authentication",
        }
    }
}

impl std::fmt::Display for DeletionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserRecord => write!(f, "user record deletion"),
            Self::Credentials => write!(f, "credentials deletion"),
        }
    }
}

/// Which deletions took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeletionOutcome {
    pub user_deleted: bool,
    pub credentials_deleted: bool,
}

/// Ways a deletion can fail.
#[derive(Error, Debug)]
pub enum DeletionError {
    /// user-service has no such user.
    #[error("user {id} not found: {source}")]
    NotFound {
        id: UserId,
        #[source]
        source: DownstreamError,
    },

    /// A service could not be reached in time.
    #[error("{step} for user {id} failed, service unavailable: {source}")]
    Unavailable {
        id: UserId,
        step: DeletionStep,
        outcome: DeletionOutcome,
        #[source]
        source: DownstreamError,
    },

    /// Any other failure.
    #[error("{step} for user {id} failed: {source}")]
    Failed {
        id: UserId,
        step: DeletionStep,
        outcome: DeletionOutcome,
        #[source]
        source: DownstreamError,
    },
}

impl DeletionError {
    fn classify(id: UserId, step: DeletionStep, outcome: DeletionOutcome, source: DownstreamError) -> Self {
        match (step, source.kind()) {
            (DeletionStep::UserRecord, DownstreamErrorKind::NotFound) => Self::NotFound { id, source },
            (_, DownstreamErrorKind::Unreachable) => Self::Unavailable {
                id,
                step,
                outcome,
                source,
            },
            _ => Self::Failed {
                id,
                step,
                outcome,
                source,
            },
        }
    }

    /// Which deletions took effect before the failure.
    pub fn outcome(&self) -> DeletionOutcome {
        match self {
            Self::NotFound { .. } => DeletionOutcome::default(),
            Self::Unavailable { outcome, .. } | Self::Failed { outcome, .. } => *outcome,
        }
    }
}

impl From<DeletionError> for AppError {
    fn from(err: DeletionError) -> Self {
        match &err {
            DeletionError::NotFound { id, .. } => {
                tracing::warn!(error = %err, "user not found");
                AppError::NotFound(format!("User with id {id} not found"))
            }
            DeletionError::Unavailable { step, .. } => {
                tracing::error!(error = %err, "service unavailable during user deletion");
                AppError::ServiceUnavailable(format!(
                    "{} Service is unavailable. Please try again later.",
                    step.service_name()
                ))
            }
            DeletionError::Failed { .. } => AppError::Internal(err.to_string()),
        }
    }
}

/// Deletion over user-service and auth-service.
#[derive(Debug, Clone)]
pub struct DeletionSaga {
    users: UserServiceClient,
    auth: AuthServiceClient,
}

impl DeletionSaga {
    pub fn new(users: UserServiceClient, auth: AuthServiceClient) -> Self {
        Self { users, auth }
    }

    /// Run the saga. Returns the record user-service deleted.
    pub async fn run(&self, scope: &RequestScope, id: UserId) -> Result<UserRecord, DeletionError> {
        tracing::info!(user_id = id, "starting user deletion");
        let mut outcome = DeletionOutcome::default();

        let record = self
            .users
            .delete_user(scope, id)
            .await
            .map_err(|e| DeletionError::classify(id, DeletionStep::UserRecord, outcome, e))?;
        outcome.user_deleted = true;

        self.auth
            .delete_credentials(scope, id)
            .await
            .map_err(|e| DeletionError::classify(id, DeletionStep::Credentials, outcome, e))?;
        outcome.credentials_deleted = true;

        tracing::info!(user_id = id, ?outcome, "user deleted");
        Ok(record)
    }
}
