//! HTTP handler functions for the flood map page and API.
//!
//! Everything under `/api/pages/{page_id}` acts on the controller of that
//! one page load; unknown or evicted ids answer 404.

#![allow(clippy::unused_async)]

use actix_web::{HttpResponse, web};
use flood_map_flood_models::catalog;
use flood_map_page::{LookupOutcome, PageId, SelectedArea, read_page, view, write_page};
use flood_map_server_models::{
    ApiAlerts, ApiFragments, ApiHealth, ApiHotspot, ApiMapStatus, ApiPageState, ApiSelection,
    ApiStats, LookupRequest, SelectRequest,
};

use crate::{AppState, page_api_base};

fn unknown_page(id: &PageId) -> HttpResponse {
    log::debug!("Request for unknown page {id}");
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "Unknown page"
    }))
}

/// `GET /`
///
/// Opens a new page with its own state and alert fetch, then renders it.
pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    let (id, page) = state.open_page();
    let html = read_page(&page)
        .render_page(&page_api_base(&id))
        .into_string();
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/hotspots`
///
/// Returns the hotspot catalog with derived risk levels.
pub async fn hotspots() -> HttpResponse {
    let hotspots: Vec<ApiHotspot> = catalog().iter().map(ApiHotspot::from).collect();
    HttpResponse::Ok().json(hotspots)
}

/// `GET /api/pages/{page_id}/alerts`
pub async fn alerts(state: web::Data<AppState>, path: web::Path<PageId>) -> HttpResponse {
    let Some(page) = state.page(&path) else {
        return unknown_page(&path);
    };
    let controller = read_page(&page);
    HttpResponse::Ok().json(ApiAlerts {
        loading: controller.alerts().is_loading(),
        alerts: controller.alerts().records().to_vec(),
    })
}

/// `GET /api/pages/{page_id}/state`
pub async fn page_state(state: web::Data<AppState>, path: web::Path<PageId>) -> HttpResponse {
    let Some(page) = state.page(&path) else {
        return unknown_page(&path);
    };
    let snapshot = read_page(&page).snapshot();
    HttpResponse::Ok().json(ApiPageState::from(&snapshot))
}

/// `GET /api/pages/{page_id}/stats`
pub async fn stats(state: web::Data<AppState>, path: web::Path<PageId>) -> HttpResponse {
    let Some(page) = state.page(&path) else {
        return unknown_page(&path);
    };
    let stats = read_page(&page).stats();
    HttpResponse::Ok().json(ApiStats::from(stats))
}

/// `GET /api/pages/{page_id}/fragments`
///
/// Re-rendered alert list, statistics, and selected-area card.
pub async fn fragments(state: web::Data<AppState>, path: web::Path<PageId>) -> HttpResponse {
    let Some(page) = state.page(&path) else {
        return unknown_page(&path);
    };
    let snapshot = read_page(&page).snapshot();
    HttpResponse::Ok().json(ApiFragments {
        alerts_loading: snapshot.alerts.is_loading(),
        alerts_html: view::render_alerts(&snapshot.alerts).into_string(),
        stats_html: view::render_stats(&snapshot.stats).into_string(),
        selected_html: view::render_selected(snapshot.selected.as_ref()).into_string(),
    })
}

/// `POST /api/pages/{page_id}/lookup`
///
/// Resolves a postal code to a hotspot. Codes that are too short are
/// ignored and answered with an empty selection.
pub async fn lookup(
    state: web::Data<AppState>,
    path: web::Path<PageId>,
    body: web::Json<LookupRequest>,
) -> HttpResponse {
    let Some(page) = state.page(&path) else {
        return unknown_page(&path);
    };
    let outcome = write_page(&page).lookup(&body.postal_code);

    let response = match outcome {
        LookupOutcome::Ignored => ApiSelection {
            selected: None,
            selected_html: None,
            map_command: None,
        },
        LookupOutcome::Selected { hotspot, command } => ApiSelection {
            selected: Some(ApiHotspot::from(&hotspot)),
            selected_html: Some(
                view::render_selected(Some(&SelectedArea::from(hotspot))).into_string(),
            ),
            map_command: command,
        },
    };

    HttpResponse::Ok().json(response)
}

/// `POST /api/pages/{page_id}/select`
///
/// Selects a hotspot by name (marker click).
pub async fn select(
    state: web::Data<AppState>,
    path: web::Path<PageId>,
    body: web::Json<SelectRequest>,
) -> HttpResponse {
    let Some(page) = state.page(&path) else {
        return unknown_page(&path);
    };
    let selected = write_page(&page).select(&body.name).copied();

    match selected {
        Some(hotspot) => HttpResponse::Ok().json(ApiSelection {
            selected: Some(ApiHotspot::from(&hotspot)),
            selected_html: Some(
                view::render_selected(Some(&SelectedArea::from(hotspot))).into_string(),
            ),
            map_command: None,
        }),
        None => {
            log::warn!("Select for unknown hotspot {:?}", body.name);
            HttpResponse::NotFound().json(serde_json::json!({
                "error": "Unknown hotspot"
            }))
        }
    }
}

/// `POST /api/pages/{page_id}/banner/dismiss`
pub async fn dismiss_banner(state: web::Data<AppState>, path: web::Path<PageId>) -> HttpResponse {
    let Some(page) = state.page(&path) else {
        return unknown_page(&path);
    };
    write_page(&page).dismiss_banner();
    HttpResponse::NoContent().finish()
}

/// `POST /api/pages/{page_id}/map/ready`
///
/// The browser constructed the map. Replays a re-center queued while the
/// map was loading.
pub async fn map_ready(state: web::Data<AppState>, path: web::Path<PageId>) -> HttpResponse {
    let Some(page) = state.page(&path) else {
        return unknown_page(&path);
    };
    let mut controller = write_page(&page);
    let map_command = controller.map_ready();
    log::info!("Map ready on page {}", *path);
    HttpResponse::Ok().json(ApiMapStatus {
        map_state: controller.map_state(),
        map_command,
    })
}

/// `POST /api/pages/{page_id}/map/timeout`
pub async fn map_timeout(state: web::Data<AppState>, path: web::Path<PageId>) -> HttpResponse {
    let Some(page) = state.page(&path) else {
        return unknown_page(&path);
    };
    let mut controller = write_page(&page);
    controller.map_timed_out();
    HttpResponse::Ok().json(ApiMapStatus {
        map_state: controller.map_state(),
        map_command: None,
    })
}

/// `POST /api/pages/{page_id}/map/retry`
pub async fn map_retry(state: web::Data<AppState>, path: web::Path<PageId>) -> HttpResponse {
    let Some(page) = state.page(&path) else {
        return unknown_page(&path);
    };
    let mut controller = write_page(&page);
    controller.map_retry();
    HttpResponse::Ok().json(ApiMapStatus {
        map_state: controller.map_state(),
        map_command: None,
    })
}
