#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for the public flood alert feed.
//!
//! The feed is a CKAN `datastore_search` endpoint on data.gov.sg. It is
//! queried once per process; [`fetch_alerts`] swallows every failure and
//! degrades to an empty list so callers can leave their loading state
//! unconditionally.

pub mod ckan;

use std::time::Duration;

use async_trait::async_trait;
pub use flood_map_alerts_models::AlertRecord;

pub use ckan::CkanAlertSource;

/// Default datastore search endpoint.
pub const DEFAULT_API_URL: &str = "https://data.gov.sg/api/action/datastore_search";

/// Default CKAN resource ID of the flood alert dataset.
pub const DEFAULT_RESOURCE_ID: &str = "d_f1404e08587ce555b9ea3f565e2eb9a3";

/// Default maximum number of records requested.
pub const DEFAULT_LIMIT: u32 = 100;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from a single alert feed request.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Unexpected HTTP status {status}")]
    Status {
        /// The status code returned.
        status: u16,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Endpoint and query parameters for the alert feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertFeedConfig {
    /// Datastore search URL.
    pub api_url: String,
    /// CKAN resource ID.
    pub resource_id: String,
    /// Result-count limit.
    pub limit: u32,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for AlertFeedConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            resource_id: DEFAULT_RESOURCE_ID.to_string(),
            limit: DEFAULT_LIMIT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AlertFeedConfig {
    /// Builds a config from `FLOOD_ALERTS_*` environment variables, falling
    /// back to the defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: std::env::var("FLOOD_ALERTS_URL").unwrap_or(defaults.api_url),
            resource_id: std::env::var("FLOOD_ALERTS_RESOURCE_ID")
                .unwrap_or(defaults.resource_id),
            limit: parse_env("FLOOD_ALERTS_LIMIT").unwrap_or(defaults.limit),
            timeout: parse_env("FLOOD_ALERTS_TIMEOUT_SECS")
                .map_or(defaults.timeout, Duration::from_secs),
        }
    }
}

/// Reads and parses environment variable `name`.
///
/// Returns `None` when it is unset, and logs a warning and returns `None`
/// when it is set but does not parse.
#[must_use]
pub fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        log::warn!("Ignoring unparseable {name}={raw:?}");
    }
    parsed
}

/// Anything that can produce the alert feed.
#[async_trait]
pub trait AlertSource: Send + Sync {
    /// Short label for log messages.
    fn label(&self) -> &str;

    /// Performs one request for the feed.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError`] if the request, status, or body is unusable.
    async fn try_fetch(&self) -> Result<Vec<AlertRecord>, AlertError>;
}

/// Fetches the feed once, resolving to an empty list on any failure.
pub async fn fetch_alerts(source: &dyn AlertSource) -> Vec<AlertRecord> {
    match source.try_fetch().await {
        Ok(records) => {
            log::info!("Fetched {} {} alerts", records.len(), source.label());
            records
        }
        Err(e) => {
            log::warn!("Failed to fetch {} alerts, showing none: {e}", source.label());
            Vec::new()
        }
    }
}
