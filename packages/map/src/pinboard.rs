//! Static pin board adapter.
//!
//! Lays pins out by catalog index instead of by coordinate. Needs no
//! runtime, so the map is usable as soon as the page renders.

use flood_map_flood_models::Hotspot;
use maud::{Markup, html};

use crate::{AdapterKind, MapAdapter, MapCommand, MapState, render_legend};

/// Renders hotspots as absolutely-positioned pins.
#[derive(Debug, Default)]
pub struct StaticPinAdapter;

impl StaticPinAdapter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Percentage offsets `(left, top)` of the pin at catalog index `idx`.
    #[must_use]
    pub const fn pin_position(idx: usize) -> (usize, usize) {
        (20 + idx * 15, 30 + (idx % 3) * 20)
    }
}

impl MapAdapter for StaticPinAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Static
    }

    fn requires_runtime(&self) -> bool {
        false
    }

    fn render(&self, hotspots: &[Hotspot], _state: MapState, _report_base: &str) -> Markup {
        html! {
            div class="map-frame pinboard" data-adapter="static" data-state="ready" {
                @for (idx, spot) in hotspots.iter().enumerate() {
                    @let (left, top) = Self::pin_position(idx);
                    @let color = spot.severity.marker_color();
                    @let pulse = if spot.severity.is_emphasized() { " pulse" } else { "" };
                    button type="button" class="pin" data-hotspot=(spot.name)
                        style=(format!("left: {left}%; top: {top}%")) {
                        span class={ "pin-halo halo-" (color) (pulse) } {}
                        span class={ "marker-pin pin-" (color) } {}
                        span class="pin-tooltip" {
                            strong { (spot.name) }
                            span class=(spot.risk().color_token) {
                                (spot.incident_frequency) " incidents"
                            }
                        }
                    }
                }
                (render_legend())
            }
        }
    }

    fn recenter(&self, _hotspot: &Hotspot) -> Option<MapCommand> {
        None
    }
}
