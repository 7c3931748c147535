//! Page state axes and the read-only snapshot views render from.

use flood_map_alerts_models::AlertRecord;
use flood_map_flood_models::{Hotspot, RiskLevel};
use flood_map_map::MapState;
use serde::Serialize;
use strum_macros::{AsRefStr, Display};

/// Number of alerts shown in the alert list.
pub const ALERT_LIST_LIMIT: usize = 5;

/// The alert feed axis. Replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertFeedState {
    Loading,
    /// Fetch finished. A failed fetch is an empty list.
    Loaded(Vec<AlertRecord>),
}

impl AlertFeedState {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// All loaded records; empty while loading.
    #[must_use]
    pub fn records(&self) -> &[AlertRecord] {
        match self {
            Self::Loading => &[],
            Self::Loaded(records) => records,
        }
    }

    /// The records shown in the alert list, in feed order.
    #[must_use]
    pub fn visible(&self) -> &[AlertRecord] {
        let records = self.records();
        &records[..records.len().min(ALERT_LIST_LIMIT)]
    }
}

/// Info banner visibility. Dismissal is permanent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerState {
    Visible,
    Dismissed,
}

/// Combined load phase of the two asynchronous axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum PagePhase {
    AlertsLoadingMapLoading,
    AlertsLoadedMapLoading,
    AlertsLoadingMapReady,
    Ready,
}

impl PagePhase {
    /// Derives the phase from the two axes. A timed-out map counts as
    /// still loading: it has not become usable.
    #[must_use]
    pub const fn from_axes(alerts_loading: bool, map: MapState) -> Self {
        match (alerts_loading, map.is_ready()) {
            (true, false) => Self::AlertsLoadingMapLoading,
            (false, false) => Self::AlertsLoadedMapLoading,
            (true, true) => Self::AlertsLoadingMapReady,
            (false, true) => Self::Ready,
        }
    }
}

/// Statistics tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStats {
    pub hotspots_tracked: usize,
    /// Sum of incident frequencies over the catalog.
    pub total_incidents: u64,
    /// Every record in the feed, not just the visible ones.
    pub active_alerts: usize,
}

/// The currently selected hotspot with its derived risk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedArea {
    pub hotspot: Hotspot,
    pub risk: RiskLevel,
}

impl From<Hotspot> for SelectedArea {
    fn from(hotspot: Hotspot) -> Self {
        Self {
            risk: hotspot.risk(),
            hotspot,
        }
    }
}

/// Everything a render needs, detached from the controller lock.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSnapshot {
    pub hotspots: &'static [Hotspot],
    pub alerts: AlertFeedState,
    pub map: MapState,
    pub selected: Option<SelectedArea>,
    pub banner_visible: bool,
    pub stats: PageStats,
}

impl PageSnapshot {
    #[must_use]
    pub const fn phase(&self) -> PagePhase {
        PagePhase::from_axes(self.alerts.is_loading(), self.map)
    }
}
