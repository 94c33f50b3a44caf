//! Wire models for the HTTP API.

use chrono::{SecondsFormat, Utc};
use metriscope_commons::Row;
use metriscope_core::MetricsPage;
use serde::Serialize;

/// Body of `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// Server time, RFC 3339 UTC.
    pub time: String,
}

impl HealthResponse {
    pub fn now() -> Self {
        Self {
            ok: true,
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Body of `GET /api/metrics/{table}/{machine}/page`.
///
/// `continuationToken` is an explicit `null` (not omitted) when the
/// query is exhausted; the UI keys its Next button off that.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub items: Vec<Row>,
    pub continuation_token: Option<String>,
}

impl From<MetricsPage> for PageResponse {
    fn from(page: MetricsPage) -> Self {
        Self {
            items: page.items,
            continuation_token: page.continuation_token.map(|t| t.as_str().to_string()),
        }
    }
}
