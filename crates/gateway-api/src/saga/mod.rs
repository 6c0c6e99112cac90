//! # Sagas
//!
//! Multi-service operations driven by the gateway:
//!
//! - `registration`: create in user-service, then auth-service; undo the
//!   first step if the second fails.
//! - `deletion`: delete in user-service, then auth-service; no undo.
//!
//! Both take their downstream clients by constructor and receive the
//! request scope explicitly.

pub mod deletion;
pub mod registration;

pub use deletion::{DeletionError, DeletionOutcome, DeletionSaga, DeletionStep};
pub use registration::{
    Registration, RegistrationError, RegistrationRequest, RegistrationSaga, RegistrationState,
    ROLLED_BACK_MESSAGE,
};
