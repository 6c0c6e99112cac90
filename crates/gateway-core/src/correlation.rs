//! # Correlation Identity
//!
//! The per-request identity that ties every downstream call and every log
//! line back to one inbound request.
//!
//! ## Adoption
//!
//! An inbound `X-Request-Id` is reused when it is a usable header value:
//! after trimming, 1 to [`MAX_CORRELATION_ID_LEN`] visible ASCII characters.
//! Anything else (absent, blank, oversized, or containing control or
//! non-ASCII characters) is replaced by a fresh UUID v4.
//!
//! ## Outbound Headers
//!
//! | Header | Value |
//! |--------|-------|
//! | `X-Request-Id` | the correlation id |
//! | `X-Internal-Call` | `true` |
//! | `X-Source-Service` | the origin service tag (default `GATEWAY`) |

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Header carrying the correlation id, inbound and outbound.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Header marking a request as an internal call from the gateway.
pub const INTERNAL_CALL_HEADER: &str = "x-internal-call";

/// Header naming the service that originated an internal call.
pub const SOURCE_SERVICE_HEADER: &str = "x-source-service";

/// Origin tag used when no service name is configured.
pub const DEFAULT_ORIGIN_SERVICE: &str = "GATEWAY";

/// Longest inbound correlation id that is adopted verbatim.
pub const MAX_CORRELATION_ID_LEN: usize = 128;

/// An opaque correlation identifier.
///
/// Always non-empty visible ASCII, so it is a valid HTTP header value by
/// construction. Serializes as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(Arc<str>);

impl CorrelationId {
    /// Generate a new random correlation id (UUID v4, hyphenated).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string().into())
    }

    /// Parse an inbound value. Returns `None` when the value cannot be
    /// adopted as-is.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.len() > MAX_CORRELATION_ID_LEN {
            return None;
        }
        if !trimmed.bytes().all(|b| b.is_ascii_graphic()) {
            return None;
        }
        Some(Self(trimmed.into()))
    }

    /// Access the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CorrelationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CorrelationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid correlation id: {raw:?}"))
        })
    }
}

/// The correlation identity of one inbound request.
///
/// Immutable once created. Cloning is cheap (two `Arc` bumps).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationContext {
    correlation_id: CorrelationId,
    origin_service: Arc<str>,
}

impl CorrelationContext {
    /// Build a context from an explicit id and origin tag.
    pub fn new(correlation_id: CorrelationId, origin_service: impl Into<Arc<str>>) -> Self {
        Self {
            correlation_id,
            origin_service: origin_service.into(),
        }
    }

    /// Adopt the inbound header value when usable, otherwise generate a
    /// fresh id.
    pub fn adopt(inbound: Option<&str>, origin_service: impl Into<Arc<str>>) -> Self {
        let correlation_id = inbound
            .and_then(CorrelationId::parse)
            .unwrap_or_else(CorrelationId::generate);
        Self::new(correlation_id, origin_service)
    }

    /// The correlation id.
    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    /// The service tag sent as `X-Source-Service`.
    pub fn origin_service(&self) -> &str {
        &self.origin_service
    }

    /// The outbound header set for this context, as `(name, value)` pairs.
    pub fn outbound_headers(&self) -> [(&'static str, &str); 3] {
        [
            (REQUEST_ID_HEADER, self.correlation_id.as_str()),
            (INTERNAL_CALL_HEADER, "true"),
            (SOURCE_SERVICE_HEADER, self.origin_service()),
        ]
    }
}
