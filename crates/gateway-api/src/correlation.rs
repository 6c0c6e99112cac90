//! # Correlation Middleware
//!
//! Outermost request middleware. Adopts the inbound `X-Request-Id` (or
//! generates one), binds the [`RequestScope`] for the rest of the request,
//! and echoes the id on the response, whatever produced it.
//!
//! The inbound header is overwritten with the adopted id so the trace span
//! created further in records the same value the downstream calls carry.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use gateway_core::{CorrelationContext, RequestScope, DEFAULT_ORIGIN_SERVICE, REQUEST_ID_HEADER};

/// Service tag injected into request extensions, sent downstream as
/// `X-Source-Service`.
#[derive(Debug, Clone)]
pub struct OriginService(pub Arc<str>);

impl OriginService {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }
}

impl Default for OriginService {
    fn default() -> Self {
        Self::new(DEFAULT_ORIGIN_SERVICE)
    }
}

/// Adopt the correlation id, bind the request scope, echo the id.
pub async fn correlation_middleware(mut request: Request, next: Next) -> Response {
    let origin = request
        .extensions()
        .get::<OriginService>()
        .cloned()
        .unwrap_or_default();

    let inbound = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok());
    let context = CorrelationContext::adopt(inbound, origin.0);

    // Adopted and generated ids are visible ASCII, so this always succeeds.
    let header_value = HeaderValue::from_str(context.correlation_id().as_str()).ok();
    if let Some(value) = &header_value {
        request.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
    }

    let scope = RequestScope::new(context, request.uri().to_string());
    let mut response = scope.scope(next.run(request)).await;

    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// Echoes what the handler observes through the task-local scope.
    async fn observed_scope() -> String {
        match RequestScope::current() {
            Some(scope) => format!(
                "{}|{}|{}",
                scope.correlation().correlation_id(),
                scope.correlation().origin_service(),
                scope.url()
            ),
            None => "none".to_string(),
        }
    }

    fn test_app(origin: Option<&str>) -> Router {
        let router = Router::new()
            .route("/echo", get(observed_scope))
            .route("/fail", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .layer(from_fn(correlation_middleware));
        match origin {
            Some(name) => router.layer(axum::Extension(OriginService::new(name))),
            None => router,
        }
    }

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn adopts_inbound_id_and_echoes_it() {
        let req = Request::builder()
            .uri("/echo?x=1")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = test_app(None).oneshot(req).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "abc-123");
        assert_eq!(body_string(response).await, "abc-123|GATEWAY|/echo?x=1");
    }

    #[tokio::test]
    async fn generates_id_when_absent() {
        let req = Request::builder().uri("/echo").body(Body::empty()).unwrap();
        let response = test_app(None).oneshot(req).await.unwrap();
        let echoed = response.headers()["x-request-id"].to_str().unwrap().to_string();
        let body = body_string(response).await;
        assert!(!echoed.is_empty());
        assert!(body.starts_with(&format!("{echoed}|")));
    }

    #[tokio::test]
    async fn replaces_blank_inbound_id() {
        let req = Request::builder()
            .uri("/echo")
            .header("x-request-id", "   ")
            .body(Body::empty())
            .unwrap();
        let response = test_app(None).oneshot(req).await.unwrap();
        let echoed = response.headers()["x-request-id"].to_str().unwrap();
        assert!(!echoed.trim().is_empty());
    }

    #[tokio::test]
    async fn echoes_id_on_error_responses() {
        let req = Request::builder()
            .uri("/fail")
            .header("x-request-id", "err-9")
            .body(Body::empty())
            .unwrap();
        let response = test_app(None).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["x-request-id"], "err-9");
    }

    #[tokio::test]
    async fn uses_configured_origin_service() {
        let req = Request::builder()
            .uri("/echo")
            .header("x-request-id", "o-1")
            .body(Body::empty())
            .unwrap();
        let response = test_app(Some("EDGE")).oneshot(req).await.unwrap();
        assert_eq!(body_string(response).await, "o-1|EDGE|/echo");
    }
}
