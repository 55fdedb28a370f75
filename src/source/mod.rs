use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::SourceConfig;
use crate::report::snapshot::AnalyticsSnapshot;

/// Reporting window selector for snapshot fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateRange {
    #[default]
    Last7Days,
    Last30Days,
    Last90Days,
}

impl DateRange {
    /// Returns the wire label the aggregation endpoint expects.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Last7Days => "last7Days",
            Self::Last30Days => "last30Days",
            Self::Last90Days => "last90Days",
        }
    }
}

/// Errors from fetching a snapshot.
///
/// The variants let the caller distinguish "fetch failed" from "fetch
/// succeeded with an empty snapshot": an empty-but-well-formed response
/// deserializes to defaulted fields and is `Ok`, never an error.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The request never produced a usable response.
    #[error("snapshot request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("unexpected status {status} from snapshot endpoint: {body}")]
    Status { status: u16, body: String },

    /// The response body was not a well-formed snapshot.
    #[error("decoding snapshot: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Analytics snapshot source.
pub trait SnapshotSource: Send + Sync {
    /// Fetch one snapshot for the given reporting window.
    fn fetch_snapshot(
        &self,
        range: DateRange,
        bypass_cache: bool,
    ) -> impl std::future::Future<Output = Result<AnalyticsSnapshot, SourceError>> + Send;
}

/// Request body for the aggregation endpoint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRequest {
    date_range: DateRange,
    use_cache: bool,
}

/// HTTP-based snapshot source.
pub struct HttpSource {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpSource {
    /// Create a new snapshot source from configuration.
    pub fn new(cfg: &SourceConfig) -> Result<Self> {
        let timeout = if cfg.timeout.is_zero() {
            Duration::from_secs(10)
        } else {
            cfg.timeout
        };

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;

        Ok(Self {
            http,
            endpoint: cfg.endpoint.clone(),
        })
    }
}

impl SnapshotSource for HttpSource {
    async fn fetch_snapshot(
        &self,
        range: DateRange,
        bypass_cache: bool,
    ) -> Result<AnalyticsSnapshot, SourceError> {
        debug!(range = range.as_str(), bypass_cache, "fetching analytics snapshot");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&SnapshotRequest {
                date_range: range,
                use_cache: !bypass_cache,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await?;
        serde_json::from_str(&raw).map_err(SourceError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_labels() {
        assert_eq!(DateRange::Last7Days.as_str(), "last7Days");
        assert_eq!(DateRange::Last30Days.as_str(), "last30Days");
        assert_eq!(DateRange::Last90Days.as_str(), "last90Days");
    }

    #[test]
    fn test_date_range_serde_matches_labels() {
        for range in [
            DateRange::Last7Days,
            DateRange::Last30Days,
            DateRange::Last90Days,
        ] {
            let json = serde_json::to_string(&range).expect("serialize");
            assert_eq!(json, format!("{:?}", range.as_str()));

            let back: DateRange = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, range);
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = SnapshotRequest {
            date_range: DateRange::Last30Days,
            use_cache: false,
        };

        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["dateRange"], "last30Days");
        assert_eq!(json["useCache"], false);
    }

    #[test]
    fn test_decode_error_keeps_cause() {
        let bad: Result<AnalyticsSnapshot, _> =
            serde_json::from_str("not json").map_err(SourceError::Decode);
        let err = bad.expect_err("should fail");
        assert!(err.to_string().contains("decoding snapshot"));
    }
}
