//! # API Route Modules
//!
//! - `registration`: `POST /register`, the registration saga.
//! - `users`: `DELETE /users/internal-delete/:id`, the deletion saga.
//! - `actuators`: `GET /actuators/health`, aggregated backend health.
//! - `fallback`: `GET /fallback/:service`, per-service unavailability
//!   envelopes.

pub mod actuators;
pub mod fallback;
pub mod registration;
pub mod users;
