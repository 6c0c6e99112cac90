//! # Error Envelope
//!
//! The single wire shape of every error response the gateway produces:
//!
//! ```json
//! {
//!   "message": "Validation failed",
//!   "timestamp": "2025-10-04 12:34",
//!   "url": "/register",
//!   "statusCode": 400,
//!   "fieldErrors": { "email": "must be a well-formed email address" }
//! }
//! ```
//!
//! `fieldErrors` is omitted unless a request failed field validation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Field name to validation message. Ordered so envelopes serialize
/// deterministically.
pub type FieldErrors = BTreeMap<String, String>;

/// Timestamp format used in envelopes (minute precision, UTC).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Uniform error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Human-readable error message.
    pub message: String,
    /// When the error was produced, formatted with [`TIMESTAMP_FORMAT`].
    pub timestamp: String,
    /// The inbound request URL the error belongs to.
    pub url: String,
    /// HTTP status code of the response.
    pub status_code: u16,
    /// Per-field validation messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<FieldErrors>,
}

impl ErrorEnvelope {
    /// Build an envelope stamped with the current time.
    pub fn new(message: impl Into<String>, status_code: u16, url: impl Into<String>) -> Self {
        Self::at(Utc::now(), message, status_code, url)
    }

    /// Build an envelope stamped with an explicit time.
    pub fn at(
        now: DateTime<Utc>,
        message: impl Into<String>,
        status_code: u16,
        url: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
            url: url.into(),
            status_code,
            field_errors: None,
        }
    }

    /// Attach per-field validation messages. An empty map is dropped.
    pub fn with_field_errors(mut self, field_errors: FieldErrors) -> Self {
        self.field_errors = (!field_errors.is_empty()).then_some(field_errors);
        self
    }

    /// Parse a downstream service's error body. Returns `None` unless the
    /// body is an envelope with a non-empty message.
    pub fn from_downstream_body(body: &str) -> Option<Self> {
        serde_json::from_str::<Self>(body)
            .ok()
            .filter(|envelope| !envelope.message.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn serializes_camel_case_without_field_errors() {
        let now = Utc.with_ymd_and_hms(2025, 10, 4, 12, 34, 56).unwrap();
        let envelope = ErrorEnvelope::at(now, "boom", 500, "/users/internal-delete/1");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["message"], "boom");
        assert_eq!(json["timestamp"], "2025-10-04 12:34");
        assert_eq!(json["url"], "/users/internal-delete/1");
        assert_eq!(json["statusCode"], 500);
        assert!(json.get("fieldErrors").is_none());
    }

    #[test]
    fn field_errors_serialized_when_present() {
        let mut fields = FieldErrors::new();
        fields.insert("email".into(), "must not be blank".into());
        let envelope = ErrorEnvelope::new("Validation failed", 400, "/register").with_field_errors(fields);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["fieldErrors"]["email"], "must not be blank");
    }

    #[test]
    fn empty_field_errors_are_dropped() {
        let envelope =
            ErrorEnvelope::new("Validation failed", 400, "/register").with_field_errors(FieldErrors::new());
        assert!(envelope.field_errors.is_none());
    }

    #[test]
    fn parses_downstream_envelope() {
        let body = r#"{"message":"Email already in use","timestamp":"2025-10-04 12:34","url":"/api/internal/users/","statusCode":409}"#;
        let envelope = ErrorEnvelope::from_downstream_body(body).unwrap();
        assert_eq!(envelope.message, "Email already in use");
        assert_eq!(envelope.status_code, 409);
    }

    #[test]
    fn rejects_non_envelope_bodies() {
        assert!(ErrorEnvelope::from_downstream_body("Internal Server Error").is_none());
        assert!(ErrorEnvelope::from_downstream_body(r#"{"error":"x"}"#).is_none());
        assert!(ErrorEnvelope::from_downstream_body(
            r#"{"message":" ","timestamp":"t","url":"/","statusCode":400}"#
        )
        .is_none());
    }
}
