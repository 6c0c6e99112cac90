//! Aggregated health of the backends.
//!
//! Each backend exposes a Spring-style `GET /actuator/health` returning
//! `{"status": "UP", ...}`. A probe reports the `status` field verbatim,
//! `UNKNOWN` when the field is missing, and `DOWN` on any failure
//! (unreachable, timeout, non-success status, undecodable body).

use std::collections::BTreeMap;
use std::time::Duration;

use gateway_core::RequestScope;
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::Instrument;
use url::Url;

use crate::headers::ScopedRequest;
use crate::types::HealthBody;

/// Status reported when a probe fails.
pub const STATUS_DOWN: &str = "DOWN";

/// Status reported when a backend answers without a `status` field.
pub const STATUS_UNKNOWN: &str = "UNKNOWN";

/// Backend name to reported status, e.g. `{"userservice": "UP"}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct HealthReport(BTreeMap<String, String>);

impl HealthReport {
    /// Status reported for `service`, if it was probed.
    pub fn status(&self, service: &str) -> Option<&str> {
        self.0.get(service).map(String::as_str)
    }

    /// Whether every probed backend reported `UP`.
    pub fn all_up(&self) -> bool {
        !self.0.is_empty() && self.0.values().all(|s| s == "UP")
    }

    /// Number of probed backends.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no backend was probed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Health probe for one backend.
#[derive(Debug, Clone)]
pub struct HealthProbe {
    name: &'static str,
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl HealthProbe {
    pub(crate) fn new(name: &'static str, http: reqwest::Client, base_url: Url, timeout: Duration) -> Self {
        Self {
            name,
            http,
            base_url,
            timeout,
        }
    }

    /// The name this backend is reported under.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Probe the backend. Never fails: errors are reported as `DOWN`.
    pub async fn probe(&self, scope: &RequestScope) -> String {
        let endpoint = "GET /actuator/health";
        let url = crate::endpoint_url(&self.base_url, "/actuator/health");
        let request = self.http.get(&url).timeout(self.timeout).scoped(scope);

        match crate::send_json::<HealthBody>(endpoint, request).await {
            Ok(body) => body.status.unwrap_or_else(|| STATUS_UNKNOWN.to_string()),
            Err(e) => {
                tracing::warn!(service = self.name, error = %e, "health probe failed");
                STATUS_DOWN.to_string()
            }
        }
    }
}

/// Run all probes concurrently. Each probe task runs inside the caller's
/// span, so its log lines carry the request's correlation fields.
pub(crate) async fn probe_all(probes: &[HealthProbe], scope: &RequestScope) -> HealthReport {
    let mut statuses: BTreeMap<String, String> = probes
        .iter()
        .map(|p| (p.name.to_string(), STATUS_DOWN.to_string()))
        .collect();

    let mut set = JoinSet::new();
    for probe in probes.iter().cloned() {
        let scope = scope.clone();
        set.spawn(
            async move {
                let status = probe.probe(&scope).await;
                (probe.name, status)
            }
            .instrument(tracing::Span::current()),
        );
    }

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((name, status)) => {
                statuses.insert(name.to_string(), status);
            }
            Err(e) => tracing::error!(error = %e, "health probe task failed"),
        }
    }

    HealthReport(statuses)
}
