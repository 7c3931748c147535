//! Page controller: owns all page state and applies user and load events.
//!
//! All transitions are synchronous. The alert fetch and the map runtime
//! load complete independently and in either order; user actions may
//! arrive before either. One controller serves exactly one page load.
//! The controller only emits a re-center command when the map is ready,
//! and remembers a selection made while it wasn't so the command can be
//! replayed from [`PageController::map_ready`].

use flood_map_alerts_models::AlertRecord;
use flood_map_flood_models::{Hotspot, catalog};
use flood_map_map::{MapAdapter, MapCommand, MapState};
use maud::Markup;

use crate::lookup::{PostalCodeResolver, is_lookup_ready};
use crate::state::{AlertFeedState, BannerState, PagePhase, PageSnapshot, PageStats, SelectedArea};
use crate::view;

/// Result of a postal code lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LookupOutcome {
    /// The code was too short; nothing changed.
    Ignored,
    /// The selection was replaced.
    Selected {
        hotspot: Hotspot,
        /// Re-center command, present only when the map is ready.
        command: Option<MapCommand>,
    },
}

/// Owns the page state and the map adapter handle.
pub struct PageController {
    hotspots: &'static [Hotspot],
    adapter: Box<dyn MapAdapter>,
    resolver: Box<dyn PostalCodeResolver>,
    alerts: AlertFeedState,
    map: MapState,
    selection: Option<Hotspot>,
    banner: BannerState,
    pending_recenter: bool,
}

impl PageController {
    /// Creates a controller for one page load over the bundled catalog.
    /// Alerts start out loading; the map starts loading unless the adapter
    /// needs no runtime.
    #[must_use]
    pub fn new(adapter: Box<dyn MapAdapter>, resolver: Box<dyn PostalCodeResolver>) -> Self {
        let map = initial_map_state(adapter.as_ref());
        Self {
            hotspots: catalog(),
            adapter,
            resolver,
            alerts: AlertFeedState::Loading,
            map,
            selection: None,
            banner: BannerState::Visible,
            pending_recenter: false,
        }
    }

    #[must_use]
    pub const fn alerts(&self) -> &AlertFeedState {
        &self.alerts
    }

    #[must_use]
    pub const fn map_state(&self) -> MapState {
        self.map
    }

    #[must_use]
    pub const fn selection(&self) -> Option<&Hotspot> {
        self.selection.as_ref()
    }

    #[must_use]
    pub const fn banner_visible(&self) -> bool {
        matches!(self.banner, BannerState::Visible)
    }

    #[must_use]
    pub const fn phase(&self) -> PagePhase {
        PagePhase::from_axes(self.alerts.is_loading(), self.map)
    }

    /// Marks the alert feed as loading.
    pub fn begin_alert_load(&mut self) {
        self.alerts = AlertFeedState::Loading;
    }

    /// Replaces the alert feed with the fetch result.
    pub fn finish_alert_load(&mut self, records: Vec<AlertRecord>) {
        log::debug!("Alert feed loaded with {} records", records.len());
        self.alerts = AlertFeedState::Loaded(records);
    }

    /// The browser reported the map constructed. Returns the queued
    /// re-center command, if a selection was made while loading.
    pub fn map_ready(&mut self) -> Option<MapCommand> {
        self.map = MapState::Ready;
        if !std::mem::take(&mut self.pending_recenter) {
            return None;
        }
        self.selection
            .as_ref()
            .and_then(|hotspot| self.adapter.recenter(hotspot))
    }

    /// The browser gave up waiting for the map runtime.
    pub fn map_timed_out(&mut self) {
        if self.map.is_ready() {
            log::debug!("Ignoring map timeout: map already ready");
            return;
        }
        log::warn!("Map runtime did not load in time");
        self.map = MapState::TimedOut;
    }

    /// The visitor asked to retry loading the map runtime.
    pub fn map_retry(&mut self) {
        if self.map == MapState::TimedOut {
            self.map = MapState::Loading;
        }
    }

    /// Looks up a postal code. Codes shorter than the minimum are ignored
    /// without feedback.
    pub fn lookup(&mut self, postal_code: &str) -> LookupOutcome {
        if !is_lookup_ready(postal_code) {
            return LookupOutcome::Ignored;
        }
        let Some(hotspot) = self.resolver.resolve(postal_code.trim(), self.hotspots) else {
            log::warn!("No hotspot resolved for postal code");
            return LookupOutcome::Ignored;
        };
        let hotspot = *hotspot;
        log::info!("Postal code lookup selected {}", hotspot.name);
        self.selection = Some(hotspot);

        let command = if self.map.is_ready() {
            self.pending_recenter = false;
            self.adapter.recenter(&hotspot)
        } else {
            self.pending_recenter = true;
            None
        };

        LookupOutcome::Selected { hotspot, command }
    }

    /// Selects a hotspot by name, as a marker click does.
    pub fn select(&mut self, name: &str) -> Option<&Hotspot> {
        let hotspot = *self.hotspots.iter().find(|h| h.name == name)?;
        self.selection = Some(hotspot);
        self.pending_recenter = false;
        self.selection.as_ref()
    }

    /// Hides the info banner for the rest of the session.
    pub fn dismiss_banner(&mut self) {
        self.banner = BannerState::Dismissed;
    }

    #[must_use]
    pub fn stats(&self) -> PageStats {
        PageStats {
            hotspots_tracked: self.hotspots.len(),
            total_incidents: self
                .hotspots
                .iter()
                .map(|h| u64::from(h.incident_frequency))
                .sum(),
            active_alerts: self.alerts.records().len(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            hotspots: self.hotspots,
            alerts: self.alerts.clone(),
            map: self.map,
            selected: self.selection.map(SelectedArea::from),
            banner_visible: self.banner_visible(),
            stats: self.stats(),
        }
    }

    /// Renders the full page. `api_base` is the prefix of this page's API
    /// routes, handed to both the page script and the map bootstrap.
    #[must_use]
    pub fn render_page(&self, api_base: &str) -> Markup {
        let snapshot = self.snapshot();
        let map = self.adapter.render(self.hotspots, snapshot.map, api_base);
        view::render_page(&snapshot, &map, api_base)
    }
}

fn initial_map_state(adapter: &dyn MapAdapter) -> MapState {
    if adapter.requires_runtime() {
        MapState::Loading
    } else {
        MapState::Ready
    }
}
