//! Server configuration from environment variables.

use std::time::Duration;

use flood_map_alerts::{AlertFeedConfig, parse_env};
use flood_map_map::{AdapterKind, MapConfig};
use flood_map_page::DEFAULT_PAGE_CAPACITY;

/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default port.
pub const DEFAULT_PORT: u16 = 8080;

/// Invalid configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `FLOOD_MAP_ADAPTER` named an unknown adapter.
    #[error("Unknown map adapter {value:?}: expected \"leaflet\" or \"static\"")]
    UnknownAdapter {
        /// The rejected value.
        value: String,
    },
}

/// Everything needed to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub adapter: AdapterKind,
    /// Live pages kept before the oldest is evicted.
    pub max_pages: usize,
    pub map: MapConfig,
    pub alerts: AlertFeedConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            adapter: AdapterKind::default(),
            max_pages: DEFAULT_PAGE_CAPACITY,
            map: MapConfig::default(),
            alerts: AlertFeedConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `PORT`, `FLOOD_MAP_ADAPTER`, `FLOOD_MAP_MAX_PAGES`,
    /// `FLOOD_MAP_LOAD_TIMEOUT_MS`, and the `FLOOD_ALERTS_*` variables.
    /// Unparseable numbers are logged and replaced by their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownAdapter`] if `FLOOD_MAP_ADAPTER` is set
    /// to something other than a known adapter.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr);
        let port = parse_env("PORT").unwrap_or(defaults.port);
        let max_pages = parse_env("FLOOD_MAP_MAX_PAGES").unwrap_or(defaults.max_pages);

        let adapter = match std::env::var("FLOOD_MAP_ADAPTER") {
            Ok(value) => parse_adapter(&value)?,
            Err(_) => defaults.adapter,
        };

        let mut map = defaults.map;
        if let Some(ms) = parse_env("FLOOD_MAP_LOAD_TIMEOUT_MS") {
            map.load_timeout = Duration::from_millis(ms);
        }

        Ok(Self {
            bind_addr,
            port,
            adapter,
            max_pages,
            map,
            alerts: AlertFeedConfig::from_env(),
        })
    }
}

/// Parses an adapter name, case-insensitively.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownAdapter`] for unknown names.
pub fn parse_adapter(value: &str) -> Result<AdapterKind, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::UnknownAdapter {
            value: value.to_string(),
        })
}
