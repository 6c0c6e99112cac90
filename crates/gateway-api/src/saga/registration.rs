//! # Registration Saga
//!
//! Creates a user across user-service and auth-service, undoing the first
//! step when the second fails.
//!
//! ## States
//!
//! ```text
//! Pending ──▶ UserCreated ──▶ Completed
//!    │             │
//!    │             ▼
//!    │     CompensationInFlight ──▶ CompensatedFailure
//!    ▼
//!  Failed
//! ```
//!
//! The state lives only for the duration of one request. The compensating
//! delete runs on its own task so it finishes even when the caller goes
//! away; it is attempted exactly once and its failure is logged, not raised.

use chrono::{NaiveDate, Utc};
use gateway_client::{
    AuthServiceClient, DownstreamError, NewUser, Role, TokenPair, UserId, UserRecord,
    UserServiceClient,
};
use gateway_core::{FieldErrors, RequestScope};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Instrument;
use zeroize::Zeroizing;

use crate::error::AppError;

/// Message returned when registration was undone.
pub const ROLLED_BACK_MESSAGE: &str = "AuthService failed. User rolled back.";

const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Request ─────────────────────────────────────────────────────────

/// Body of `POST /register`.
///
/// Every field is optional at the serde level so that a missing field is
/// reported in `fieldErrors` instead of as a deserialization failure.
/// Custom `Debug` redacts the password.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl std::fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("name", &self.name)
            .field("surname", &self.surname)
            .field("birth_date", &self.birth_date)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("role", &self.role)
            .finish()
    }
}

impl RegistrationRequest {
    /// Field validation against an explicit current date.
    pub fn validate_at(&self, today: NaiveDate) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        for (field, value) in [
            ("name", &self.name),
            ("surname", &self.surname),
            ("email", &self.email),
            ("password", &self.password),
        ] {
            if is_blank(value) {
                errors.insert(field.to_string(), "must not be blank".to_string());
            }
        }

        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            if !is_well_formed_email(email) {
                errors.insert("email".to_string(), "must be a well-formed email address".to_string());
            }
        }

        match self.birth_date.as_deref().map(str::trim) {
            None | Some("") => {
                errors.insert("birthDate".to_string(), "must not be null".to_string());
            }
            Some(raw) => match NaiveDate::parse_from_str(raw, BIRTH_DATE_FORMAT) {
                Ok(date) if date < today => {}
                Ok(_) => {
                    errors.insert("birthDate".to_string(), "must be a past date".to_string());
                }
                Err(_) => {
                    errors.insert(
                        "birthDate".to_string(),
                        "must be a date in yyyy-MM-dd format".to_string(),
                    );
                }
            },
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and build the canonical body sent downstream.
    ///
    /// A missing role becomes `USER`; any other value must be exactly
    /// `USER` or `ADMIN`.
    pub fn canonicalize(self, today: NaiveDate) -> Result<NewUser, RegistrationError> {
        self.validate_at(today)
            .map_err(RegistrationError::InvalidFields)?;

        let role = match self.role {
            None => Role::default(),
            Some(raw) => Role::parse(&raw).ok_or(RegistrationError::InvalidRole(raw))?,
        };

        let birth_date = self
            .birth_date
            .as_deref()
            .map(str::trim)
            .and_then(|raw| NaiveDate::parse_from_str(raw, BIRTH_DATE_FORMAT).ok())
            .ok_or_else(|| {
                let mut errors = FieldErrors::new();
                errors.insert("birthDate".to_string(), "must not be null".to_string());
                RegistrationError::InvalidFields(errors)
            })?;

        Ok(NewUser {
            name: self.name.unwrap_or_default(),
            surname: self.surname.unwrap_or_default(),
            birth_date,
            email: self.email.map(|e| e.trim().to_string()).unwrap_or_default(),
            password: Zeroizing::new(self.password.unwrap_or_default()),
            role,
        })
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// A single `@` with non-empty local and domain parts, no whitespace.
fn is_well_formed_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// Successful registration: `200 { identity, credentials }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub identity: UserRecord,
    pub credentials: TokenPair,
}

// ─── State ───────────────────────────────────────────────────────────

/// Progress of one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    /// Nothing created yet.
    Pending,
    /// user-service holds the record.
    UserCreated(UserId),
    /// Both services hold the user (terminal).
    Completed(UserId),
    /// auth-service failed; the compensating delete is running.
    CompensationInFlight(UserId),
    /// The compensating delete was attempted (terminal).
    CompensatedFailure(UserId),
    /// Failed before anything was created (terminal).
    Failed,
}

impl RegistrationState {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed(_) | Self::CompensatedFailure(_) | Self::Failed
        )
    }

    /// The created user id, once known.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Pending | Self::Failed => None,
            Self::UserCreated(id)
            | Self::Completed(id)
            | Self::CompensationInFlight(id)
            | Self::CompensatedFailure(id) => Some(*id),
        }
    }

    /// Whether `next` is a legal successor of this state. The user id never
    /// changes once assigned.
    pub fn can_transition_to(&self, next: &Self) -> bool {
        match (self, next) {
            (Self::Pending, Self::UserCreated(_) | Self::Failed) => true,
            (Self::UserCreated(a), Self::Completed(b) | Self::CompensationInFlight(b)) => a == b,
            (Self::CompensationInFlight(a), Self::CompensatedFailure(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::UserCreated(_) => write!(f, "USER_CREATED"),
            Self::Completed(_) => write!(f, "COMPLETED"),
            Self::CompensationInFlight(_) => write!(f, "COMPENSATION_IN_FLIGHT"),
            Self::CompensatedFailure(_) => write!(f, "COMPENSATED_FAILURE"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Tracks the state of one run and logs each transition.
#[derive(Debug)]
struct Progress {
    state: RegistrationState,
}

impl Progress {
    fn new() -> Self {
        Self {
            state: RegistrationState::Pending,
        }
    }

    fn advance(&mut self, next: RegistrationState) {
        debug_assert!(
            self.state.can_transition_to(&next),
            "invalid registration transition: {} -> {}",
            self.state,
            next
        );
        tracing::debug!(from = %self.state, to = %next, "registration transition");
        self.state = next;
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Ways a registration can fail.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Field validation failed; nothing was sent downstream.
    #[error("registration payload invalid: {} field(s)", .0.len())]
    InvalidFields(FieldErrors),

    /// The role is not `USER` or `ADMIN`; nothing was sent downstream.
    #[error("Unknown or unsupported role: {0}")]
    InvalidRole(String),

    /// user-service did not create the record; nothing to undo.
    #[error("user creation failed: {0}")]
    UserCreation(#[source] DownstreamError),

    /// auth-service failed after the record was created; the record's
    /// deletion was attempted.
    #[error("credential registration failed for user {user_id} (compensated: {compensated}): {cause}")]
    RolledBack {
        user_id: UserId,
        #[source]
        cause: DownstreamError,
        compensated: bool,
    },
}

impl RegistrationError {
    /// The terminal state this failure leaves the saga in.
    pub fn final_state(&self) -> RegistrationState {
        match self {
            Self::InvalidFields(_) | Self::InvalidRole(_) | Self::UserCreation(_) => {
                RegistrationState::Failed
            }
            Self::RolledBack { user_id, .. } => RegistrationState::CompensatedFailure(*user_id),
        }
    }
}

impl From<RegistrationError> for AppError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::InvalidFields(fields) => AppError::invalid_fields(fields),
            RegistrationError::InvalidRole(role) => {
                AppError::validation(format!("Unknown or unsupported role: {role}"))
            }
            RegistrationError::UserCreation(cause) => AppError::from(cause),
            RegistrationError::RolledBack { .. } => AppError::RolledBack(ROLLED_BACK_MESSAGE.to_string()),
        }
    }
}

// ─── Saga ────────────────────────────────────────────────────────────

/// Registration over user-service and auth-service.
#[derive(Debug, Clone)]
pub struct RegistrationSaga {
    users: UserServiceClient,
    auth: AuthServiceClient,
}

impl RegistrationSaga {
    pub fn new(users: UserServiceClient, auth: AuthServiceClient) -> Self {
        Self { users, auth }
    }

    /// Run the saga for one request.
    pub async fn run(
        &self,
        scope: &RequestScope,
        request: RegistrationRequest,
    ) -> Result<Registration, RegistrationError> {
        let mut progress = Progress::new();

        let user = match request.canonicalize(Utc::now().date_naive()) {
            Ok(user) => user,
            Err(e) => {
                progress.advance(RegistrationState::Failed);
                return Err(e);
            }
        };
        tracing::info!(email = %user.email, role = %user.role, "registering user");

        let identity = match self.users.create_user(scope, &user).await {
            Ok(record) => record,
            Err(e) => {
                progress.advance(RegistrationState::Failed);
                tracing::warn!(error = %e, "user creation failed");
                return Err(RegistrationError::UserCreation(e));
            }
        };
        let user_id = identity.user_id;
        progress.advance(RegistrationState::UserCreated(user_id));

        match self.auth.register(scope, &user).await {
            Ok(credentials) => {
                progress.advance(RegistrationState::Completed(user_id));
                tracing::info!(user_id, "user registered");
                Ok(Registration {
                    identity,
                    credentials,
                })
            }
            Err(cause) => {
                tracing::warn!(user_id, error = %cause, "credential registration failed, rolling back");
                progress.advance(RegistrationState::CompensationInFlight(user_id));
                let compensated = self.compensate(scope, user_id).await;
                progress.advance(RegistrationState::CompensatedFailure(user_id));
                Err(RegistrationError::RolledBack {
                    user_id,
                    cause,
                    compensated,
                })
            }
        }
    }

    /// Delete the created record on a task of its own and wait for it.
    /// Returns whether the delete succeeded.
    async fn compensate(&self, scope: &RequestScope, user_id: UserId) -> bool {
        let users = self.users.clone();
        let task_scope = scope.clone();
        let task = scope
            .clone()
            .scope(async move { users.delete_user(&task_scope, user_id).await })
            .instrument(tracing::Span::current());

        match tokio::spawn(task).await {
            Ok(Ok(_)) => {
                tracing::info!(user_id, "user creation rolled back");
                true
            }
            Ok(Err(e)) => {
                tracing::error!(user_id, error = %e, "failed to roll back user creation");
                false
            }
            Err(e) => {
                tracing::error!(user_id, error = %e, "rollback task failed");
                false
            }
        }
    }
}
