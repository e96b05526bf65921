//! Live advisory feed (P2P earthquake history API, code 552).

use std::time::Duration;

use advisory_common::{AdvisoryError, AdvisoryRecord, AdvisoryResult};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::AdvisorySource;

/// Latest tsunami forecast only.
pub const DEFAULT_FEED_URL: &str = "https://api.p2pquake.net/v2/history?codes=552&limit=1";

/// Configuration for the live feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveSourceConfig {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_user_agent() -> String {
    concat!("tsunami-map/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for LiveSourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// One entry of the history response. Only the fields we use.
#[derive(Debug, Deserialize)]
struct HistoryEntry {
    #[serde(default)]
    cancelled: bool,
    #[serde(default)]
    areas: Vec<serde_json::Value>,
}

/// Extract the latest snapshot's records from a history response body.
///
/// The feed returns newest-first; only the first entry is used. A
/// cancelled forecast yields no records, which clears the map. Areas that
/// fail to decode are skipped individually.
pub fn parse_history(body: &str) -> AdvisoryResult<Vec<AdvisoryRecord>> {
    let entries: Vec<HistoryEntry> = serde_json::from_str(body)?;
    let latest = entries
        .into_iter()
        .next()
        .ok_or_else(|| AdvisoryError::MalformedResponse("empty history".to_string()))?;

    if latest.cancelled {
        return Ok(Vec::new());
    }

    let records = latest
        .areas
        .into_iter()
        .enumerate()
        .filter_map(|(i, area)| match serde_json::from_value::<AdvisoryRecord>(area) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index = i, error = %e, "Skipping undecodable advisory area");
                None
            }
        })
        .collect();
    Ok(records)
}

/// Fetches advisories from the remote feed.
pub struct LiveSource {
    client: Client,
    config: LiveSourceConfig,
}

impl LiveSource {
    pub fn new(config: LiveSourceConfig) -> AdvisoryResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdvisoryError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }
}

#[async_trait]
impl AdvisorySource for LiveSource {
    #[instrument(skip(self), fields(url = %self.config.url))]
    async fn fetch(&self) -> AdvisoryResult<Vec<AdvisoryRecord>> {
        let response = self
            .client
            .get(&self.config.url)
            .header(header::USER_AGENT, &self.config.user_agent)
            .send()
            .await
            .map_err(|e| AdvisoryError::Acquisition(e.to_string()))?;

        let status = response.status();
        debug!(status = %status, "Advisory feed responded");

        if status != StatusCode::OK {
            return Err(AdvisoryError::UnexpectedStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AdvisoryError::Acquisition(e.to_string()))?;

        let records = parse_history(&body)?;
        info!(count = records.len(), "Fetched live advisories");
        Ok(records)
    }

    fn name(&self) -> &'static str {
        "live"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisory_common::Grade;

    #[test]
    fn test_default_config_points_at_latest_forecast() {
        let config = LiveSourceConfig::default();
        assert!(config.url.contains("codes=552"));
        assert!(config.url.contains("limit=1"));
        assert!(config.user_agent.starts_with("tsunami-map/"));
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: LiveSourceConfig =
            serde_json::from_str(r#"{"url": "http://localhost:9999/history"}"#).unwrap();
        assert_eq!(config.url, "http://localhost:9999/history");
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn test_only_first_entry_is_used() {
        let body = r#"[
            {"code": 552, "areas": [{"name": "福島県", "grade": "Warning"}]},
            {"code": 552, "areas": [{"name": "宮城県", "grade": "Watch"}]}
        ]"#;
        let records = parse_history(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "福島県");
    }

    #[test]
    fn test_undecodable_area_is_skipped() {
        let body = r#"[
            {"code": 552, "areas": [
                {"grade": "Warning"},
                {"name": "宮城県", "grade": "Watch"}
            ]}
        ]"#;
        let records = parse_history(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "宮城県");
    }

    #[test]
    fn test_bad_field_drops_only_the_dependent_detail() {
        let body = r#"[
            {"code": 552, "areas": [
                {"name": "福島県", "grade": "Warning", "firstHeight": {}},
                {"name": "宮城県", "grade": null},
                {"name": "岩手県", "grade": "Warning", "maxHeight": {"value": 5, "description": 5}}
            ]}
        ]"#;
        let records = parse_history(body).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].grade, Grade::Warning);
        assert!(records[0].first_height.is_none());

        assert_eq!(records[1].name, "宮城県");
        assert_eq!(records[1].grade, Grade::default());

        assert_eq!(records[2].grade, Grade::Warning);
        assert_eq!(records[2].height_value(), Some(5.0));
    }

    #[test]
    fn test_empty_history_is_malformed() {
        let err = parse_history("[]").unwrap_err();
        assert!(matches!(err, AdvisoryError::MalformedResponse(_)));
    }

    #[test]
    fn test_non_array_body_is_malformed() {
        let err = parse_history(r#"{"error": "rate limited"}"#).unwrap_err();
        assert!(err.is_acquisition());
    }

    #[tokio::test]
    async fn test_unreachable_feed_is_acquisition_error() {
        let source = LiveSource::new(LiveSourceConfig {
            url: "http://127.0.0.1:9/history".to_string(),
            timeout_secs: 2,
            ..LiveSourceConfig::default()
        })
        .unwrap();

        let err = source.fetch().await.unwrap_err();
        assert!(err.is_acquisition(), "unexpected error: {}", err);
    }
}
