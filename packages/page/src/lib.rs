#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Page state, postal code lookup, and HTML views for the flood map.
//!
//! [`PageController`] owns the state of one page load: the alert feed, the
//! map load state, the selected hotspot, and the info banner. The server
//! keeps one controller per page in a [`PageRegistry`]; transitions are
//! synchronous so a controller's lock is never held across an await.

pub mod controller;
pub mod lookup;
pub mod registry;
pub mod state;
pub mod view;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use flood_map_alerts::{AlertSource, fetch_alerts};

pub use controller::{LookupOutcome, PageController};
pub use lookup::{PostalCodeResolver, RandomResolver, SeededResolver};
pub use registry::{DEFAULT_PAGE_CAPACITY, PageId, PageRegistry};
pub use state::{AlertFeedState, PagePhase, PageSnapshot, PageStats, SelectedArea};

/// A controller shared between request handlers and background tasks.
pub type SharedController = Arc<RwLock<PageController>>;

/// Locks a page for reading. A poisoned lock is recovered: every
/// transition leaves the controller consistent.
pub fn read_page(controller: &RwLock<PageController>) -> RwLockReadGuard<'_, PageController> {
    controller.read().unwrap_or_else(PoisonError::into_inner)
}

/// Locks a page for writing.
pub fn write_page(controller: &RwLock<PageController>) -> RwLockWriteGuard<'_, PageController> {
    controller.write().unwrap_or_else(PoisonError::into_inner)
}

/// Runs the one alert fetch of a page load.
///
/// The feed is marked loading, fetched without holding the lock, and then
/// replaced with the result. A failed fetch still leaves the loading state
/// (as an empty feed).
pub async fn load_alerts(controller: &RwLock<PageController>, source: &dyn AlertSource) {
    write_page(controller).begin_alert_load();

    let records = fetch_alerts(source).await;

    write_page(controller).finish_alert_load(records);
}
