#![deny(missing_docs)]

//! # gateway-core: Foundational Types for the Gateway
//!
//! Every other crate in the workspace depends on this one. It has no internal
//! crate dependencies.
//!
//! ## Design Principles
//!
//! 1. **One correlation identity per inbound request.** A [`CorrelationContext`]
//!    is adopted from the inbound `X-Request-Id` header or freshly generated,
//!    and never changes for the lifetime of the request.
//!
//! 2. **Task-scoped, never global.** The [`RequestScope`] that carries the
//!    correlation identity is bound with `tokio::task_local!`. Concurrent
//!    requests cannot observe each other's identity, and code that spawns a
//!    new task must re-bind the scope it captured.
//!
//! 3. **One wire shape for errors.** [`ErrorEnvelope`] is the only error body
//!    the gateway emits, and the shape it expects when relaying a downstream
//!    service's client error.

pub mod correlation;
pub mod envelope;
pub mod scope;

pub use correlation::{
    CorrelationContext, CorrelationId, DEFAULT_ORIGIN_SERVICE, INTERNAL_CALL_HEADER,
    REQUEST_ID_HEADER, SOURCE_SERVICE_HEADER,
};
pub use envelope::{ErrorEnvelope, FieldErrors};
pub use scope::{BearerCredential, RequestScope};
