//! # Middleware
//!
//! - `tracing_layer`: one span per request carrying the correlation id.
//!
//! Correlation and the authentication gate live in [`crate::correlation`]
//! and [`crate::auth`].

pub mod tracing_layer;
