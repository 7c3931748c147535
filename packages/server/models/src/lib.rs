#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the flood map server.
//!
//! These types are serialized to JSON for the page script. They are
//! separate from the page state types to allow independent evolution of
//! the API contract.

use flood_map_alerts_models::AlertRecord;
use flood_map_flood_models::{Hotspot, Severity};
use flood_map_map::{MapCommand, MapState};
use flood_map_page::{PagePhase, PageSnapshot, PageStats};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    pub healthy: bool,
    pub version: String,
}

/// A hotspot with its derived risk, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHotspot {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub incident_frequency: u32,
    pub severity: Severity,
    /// Risk label, e.g. `"High Risk"`.
    pub risk_level: String,
    pub risk_color: String,
    pub risk_background: String,
}

impl From<&Hotspot> for ApiHotspot {
    fn from(hotspot: &Hotspot) -> Self {
        let risk = hotspot.risk();
        Self {
            name: hotspot.name.to_string(),
            latitude: hotspot.latitude,
            longitude: hotspot.longitude,
            incident_frequency: hotspot.incident_frequency,
            severity: hotspot.severity,
            risk_level: risk.label.to_string(),
            risk_color: risk.color_token.to_string(),
            risk_background: risk.background_token.to_string(),
        }
    }
}

/// Alert feed state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAlerts {
    /// `true` until the one fetch has finished.
    pub loading: bool,
    /// All records in feed order.
    pub alerts: Vec<AlertRecord>,
}

/// Statistics tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStats {
    pub hotspots_tracked: usize,
    pub total_incidents: u64,
    pub active_alerts: usize,
}

impl From<PageStats> for ApiStats {
    fn from(stats: PageStats) -> Self {
        Self {
            hotspots_tracked: stats.hotspots_tracked,
            total_incidents: stats.total_incidents,
            active_alerts: stats.active_alerts,
        }
    }
}

/// Full page state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPageState {
    pub phase: PagePhase,
    pub alerts_loading: bool,
    pub map_state: MapState,
    pub selected: Option<ApiHotspot>,
    pub banner_visible: bool,
    pub stats: ApiStats,
}

impl From<&PageSnapshot> for ApiPageState {
    fn from(snapshot: &PageSnapshot) -> Self {
        Self {
            phase: snapshot.phase(),
            alerts_loading: snapshot.alerts.is_loading(),
            map_state: snapshot.map,
            selected: snapshot
                .selected
                .as_ref()
                .map(|area| ApiHotspot::from(&area.hotspot)),
            banner_visible: snapshot.banner_visible,
            stats: snapshot.stats.into(),
        }
    }
}

/// `POST /api/lookup` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    pub postal_code: String,
}

/// `POST /api/select` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectRequest {
    pub name: String,
}

/// Response to a lookup or a marker click.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSelection {
    /// The selected hotspot; `None` when a lookup was ignored.
    pub selected: Option<ApiHotspot>,
    /// Re-rendered selected-area card; `None` when nothing changed.
    pub selected_html: Option<String>,
    /// Command for the map, when it should move.
    pub map_command: Option<MapCommand>,
}

/// Response to map lifecycle reports.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMapStatus {
    pub map_state: MapState,
    /// Re-center command replayed after the map became ready.
    pub map_command: Option<MapCommand>,
}

/// Re-rendered fragments for in-place page updates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFragments {
    pub alerts_loading: bool,
    pub alerts_html: String,
    pub stats_html: String,
    pub selected_html: String,
}
