#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map adapters for the flood hotspot page.
//!
//! A [`MapAdapter`] turns the hotspot catalog into the map panel markup and
//! decides how the map reacts to a new selection. Two adapters exist:
//!
//! * [`LeafletAdapter`] renders an interactive Leaflet widget. Leaflet runs
//!   in the browser, so the adapter emits a bootstrap script that loads the
//!   runtime from its CDN, reports readiness back to the server, and
//!   applies [`MapCommand`]s dispatched by the page.
//! * [`StaticPinAdapter`] renders absolutely-positioned pins with no
//!   runtime. It is ready immediately and never re-centers.
//!
//! The browser side talks to the rest of the page through two DOM events
//! on `document`: `floodmap:select` (detail: hotspot name) when a marker is
//! clicked, and `floodmap:command` (detail: a serialized [`MapCommand`])
//! when the page wants the map to move.

mod html;
mod leaflet;
mod pinboard;

use std::time::Duration;

use flood_map_flood_models::{Hotspot, RiskTier};
use maud::{Markup, html};
use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

pub use leaflet::LeafletAdapter;
pub use pinboard::StaticPinAdapter;

/// Which adapter renders the map panel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AdapterKind {
    /// Interactive Leaflet widget.
    #[default]
    Leaflet,
    /// Static positioned pins.
    Static,
}

impl AdapterKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Leaflet, Self::Static]
    }
}

/// Load state of the browser-side map runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum MapState {
    /// Runtime requested, not yet reported loaded.
    Loading,
    /// Runtime loaded and the map constructed.
    Ready,
    /// Runtime did not load within the configured timeout.
    TimedOut,
}

impl MapState {
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// An instruction for the browser-side map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MapCommand {
    /// Re-center and zoom on a coordinate.
    #[serde(rename_all = "camelCase")]
    FlyTo {
        latitude: f64,
        longitude: f64,
        zoom: u8,
        animate: bool,
    },
}

/// Static settings shared by the adapters.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// Initial map center as `(latitude, longitude)`.
    pub center: (f64, f64),
    /// Initial zoom level.
    pub zoom: u8,
    /// Zoom level used when flying to a selected hotspot.
    pub focus_zoom: u8,
    /// Tile URL template with `{s}`, `{z}`, `{x}`, `{y}` placeholders.
    pub tile_url: String,
    /// Tile attribution HTML.
    pub tile_attribution: String,
    /// Leaflet stylesheet URL.
    pub leaflet_css_url: String,
    /// Leaflet runtime URL.
    pub leaflet_js_url: String,
    /// How long the browser waits for the runtime before offering a retry.
    pub load_timeout: Duration,
    /// Radius in meters of the overlay drawn around high-severity hotspots.
    pub emphasis_radius_m: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: (1.3521, 103.8198),
            zoom: 12,
            focus_zoom: 14,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            tile_attribution:
                "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
                    .to_string(),
            leaflet_css_url: "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css".to_string(),
            leaflet_js_url: "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js".to_string(),
            load_timeout: Duration::from_secs(15),
            emphasis_radius_m: 500.0,
        }
    }
}

/// One hotspot as the browser-side map sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub color: &'static str,
    pub emphasized: bool,
    pub incidents: u32,
    pub risk_label: &'static str,
    pub risk_color: &'static str,
}

impl From<&Hotspot> for Marker {
    fn from(hotspot: &Hotspot) -> Self {
        let risk = hotspot.risk();
        Self {
            name: hotspot.name.to_string(),
            latitude: hotspot.latitude,
            longitude: hotspot.longitude,
            color: hotspot.severity.marker_color(),
            emphasized: hotspot.severity.is_emphasized(),
            incidents: hotspot.incident_frequency,
            risk_label: risk.label,
            risk_color: risk.color_token,
        }
    }
}

/// Bridge between page state and a concrete map rendering.
pub trait MapAdapter: Send + Sync {
    /// Which adapter this is.
    fn kind(&self) -> AdapterKind;

    /// Whether a browser runtime must load before the map is usable. When
    /// `false` the map is ready as soon as the page renders.
    fn requires_runtime(&self) -> bool;

    /// Renders the map panel body (canvas, placeholder, bootstrap script).
    ///
    /// `report_base` is the URL prefix the browser side posts its
    /// `map/ready`, `map/timeout`, and `map/retry` reports under.
    fn render(&self, hotspots: &[Hotspot], state: MapState, report_base: &str) -> Markup;

    /// Command that re-centers the map on `hotspot`, if this adapter moves.
    fn recenter(&self, hotspot: &Hotspot) -> Option<MapCommand>;
}

/// Builds the adapter for `kind`.
#[must_use]
pub fn adapter_for(kind: AdapterKind, config: MapConfig) -> Box<dyn MapAdapter> {
    match kind {
        AdapterKind::Leaflet => Box::new(LeafletAdapter::new(config)),
        AdapterKind::Static => Box::new(StaticPinAdapter::new()),
    }
}

/// Renders the risk legend shown in the corner of every map panel.
#[must_use]
pub fn render_legend() -> Markup {
    html! {
        div class="map-legend" {
            p class="legend-title" { "Flood Frequency" }
            @for tier in RiskTier::all() {
                div class="legend-row" {
                    span class={ "legend-dot dot-" (legend_color(*tier)) } {}
                    span { (tier.legend()) }
                }
            }
        }
    }
}

const fn legend_color(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::High => "red",
        RiskTier::Medium => "orange",
        RiskTier::Lower => "yellow",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flood_map_flood_models::catalog;

    #[test]
    fn parses_adapter_kind() {
        assert_eq!("leaflet".parse::<AdapterKind>().unwrap(), AdapterKind::Leaflet);
        assert_eq!("Static".parse::<AdapterKind>().unwrap(), AdapterKind::Static);
        assert!("mapbox".parse::<AdapterKind>().is_err());
        assert_eq!(AdapterKind::default(), AdapterKind::Leaflet);
    }

    #[test]
    fn marker_reflects_severity_and_risk() {
        let bukit_timah = &catalog()[1];
        let marker = Marker::from(bukit_timah);
        assert_eq!(marker.color, "red");
        assert!(marker.emphasized);
        assert_eq!(marker.risk_label, "High Risk");

        let changi = &catalog()[3];
        let marker = Marker::from(changi);
        assert_eq!(marker.color, "orange");
        assert!(!marker.emphasized);
        assert_eq!(marker.risk_label, "Lower Risk");
    }

    #[test]
    fn fly_to_serializes_tagged() {
        let cmd = MapCommand::FlyTo {
            latitude: 1.5,
            longitude: 103.5,
            zoom: 14,
            animate: true,
        };
        let json = serde_json::to_value(cmd).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "flyTo",
                "latitude": 1.5,
                "longitude": 103.5,
                "zoom": 14,
                "animate": true,
            })
        );
    }

    #[test]
    fn legend_lists_every_tier() {
        let legend = render_legend().into_string();
        assert!(legend.contains("High Risk (10+ incidents)"));
        assert!(legend.contains("Medium Risk (6-9 incidents)"));
        assert!(legend.contains("Lower Risk (1-5 incidents)"));
        assert!(legend.contains(r#"<span class="legend-dot dot-red"></span>"#));
    }

    #[test]
    fn adapters_differ_in_runtime_needs() {
        let leaflet = adapter_for(AdapterKind::Leaflet, MapConfig::default());
        let pins = adapter_for(AdapterKind::Static, MapConfig::default());
        assert!(leaflet.requires_runtime());
        assert!(!pins.requires_runtime());
        assert_eq!(leaflet.kind(), AdapterKind::Leaflet);
        assert_eq!(pins.kind(), AdapterKind::Static);
    }
}
