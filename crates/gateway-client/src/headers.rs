//! Outbound header injection.
//!
//! Every request this crate sends goes through [`ScopedRequest::scoped`],
//! which stamps the correlation headers of the current [`RequestScope`] and,
//! when the caller's credential is being forwarded, the `Authorization`
//! header.

use gateway_core::RequestScope;
use reqwest::header::AUTHORIZATION;
use reqwest::RequestBuilder;

/// Attach a request scope to an outbound request.
pub trait ScopedRequest {
    /// Add `X-Request-Id`, `X-Internal-Call`, `X-Source-Service`, and the
    /// forwarded `Authorization` header when present.
    fn scoped(self, scope: &RequestScope) -> Self;
}

impl ScopedRequest for RequestBuilder {
    fn scoped(self, scope: &RequestScope) -> Self {
        let mut builder = self;
        for (name, value) in scope.correlation().outbound_headers() {
            builder = builder.header(name, value);
        }
        match scope.credential() {
            Some(credential) => builder.header(AUTHORIZATION, credential.authorization_value()),
            None => builder,
        }
    }
}
