//! # Request Scope
//!
//! The task-local binding that makes the current request's correlation
//! identity retrievable from any point of its asynchronous call chain.
//!
//! The binding uses `tokio::task_local!` rather than `thread_local!`: the
//! work-stealing scheduler moves a task between OS threads at every await
//! point, and a thread-local slot would be shared by every task that happens
//! to run on that thread.
//!
//! A spawned task does not inherit the binding. Capture the scope with
//! [`RequestScope::current`] before spawning and re-bind it with
//! [`RequestScope::scope`] inside the new task.

use std::future::Future;
use std::sync::Arc;

use zeroize::Zeroizing;

use crate::correlation::CorrelationContext;

tokio::task_local! {
    static CURRENT_SCOPE: RequestScope;
}

/// A caller's bearer credential, forwarded verbatim to downstream services.
///
/// The `Debug` implementation redacts the token and the backing buffer is
/// zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerCredential(Arc<Zeroizing<String>>);

impl BearerCredential {
    /// Wrap a raw token (without the `Bearer ` prefix).
    pub fn new(token: impl Into<String>) -> Self {
        Self(Arc::new(Zeroizing::new(token.into())))
    }

    /// The raw token.
    pub fn token(&self) -> &str {
        self.0.as_str()
    }

    /// The `Authorization` header value for this credential.
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.token())
    }
}

impl std::fmt::Debug for BearerCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerCredential([REDACTED])")
    }
}

/// Everything about the current inbound request that outbound calls and
/// error artifacts need.
#[derive(Debug, Clone)]
pub struct RequestScope {
    correlation: CorrelationContext,
    url: Arc<str>,
    credential: Option<BearerCredential>,
}

impl RequestScope {
    /// Create a scope for an inbound request to `url` (path and query).
    pub fn new(correlation: CorrelationContext, url: impl Into<Arc<str>>) -> Self {
        Self {
            correlation,
            url: url.into(),
            credential: None,
        }
    }

    /// Return a copy of this scope that forwards `credential` downstream.
    pub fn with_credential(&self, credential: BearerCredential) -> Self {
        Self {
            credential: Some(credential),
            ..self.clone()
        }
    }

    /// The correlation identity.
    pub fn correlation(&self) -> &CorrelationContext {
        &self.correlation
    }

    /// The inbound request URL (path and query).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The forwarded credential, if the request carried one.
    pub fn credential(&self) -> Option<&BearerCredential> {
        self.credential.as_ref()
    }

    /// Run `fut` with this scope bound as the current one.
    pub async fn scope<F: Future>(self, fut: F) -> F::Output {
        CURRENT_SCOPE.scope(self, fut).await
    }

    /// The scope bound to the calling task, if any.
    pub fn current() -> Option<Self> {
        CURRENT_SCOPE.try_with(RequestScope::clone).ok()
    }
}
