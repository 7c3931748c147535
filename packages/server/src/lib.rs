#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the flood map application.
//!
//! Serves the server-rendered page and the JSON API its inline script
//! talks to. Every `GET /` opens a new page: a [`PageController`] of its
//! own, registered under a fresh id, with its own alert fetch running in
//! the background. The page script and the map bootstrap address that
//! controller under `/api/pages/{id}`.

pub mod config;
mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use flood_map_alerts::{AlertSource, CkanAlertSource};
use flood_map_map::{AdapterKind, MapConfig, adapter_for};
use flood_map_page::{
    PageController, PageId, PageRegistry, RandomResolver, SharedController, load_alerts,
};

pub use config::{ConfigError, ServerConfig};

/// Shared application state.
pub struct AppState {
    pages: PageRegistry,
    adapter: AdapterKind,
    map: MapConfig,
    source: Arc<dyn AlertSource>,
}

impl AppState {
    #[must_use]
    pub fn new(config: &ServerConfig, source: Arc<dyn AlertSource>) -> Self {
        Self {
            pages: PageRegistry::new(config.max_pages),
            adapter: config.adapter,
            map: config.map.clone(),
            source,
        }
    }

    /// Opens a page with fresh state and spawns its alert fetch on the
    /// current actix runtime.
    pub fn open_page(&self) -> (PageId, SharedController) {
        let controller = PageController::new(
            adapter_for(self.adapter, self.map.clone()),
            Box::new(RandomResolver),
        );
        let (id, page) = self.pages.open(controller);
        log::debug!("Opened page {id}");

        let source = Arc::clone(&self.source);
        let loading = Arc::clone(&page);
        actix_rt::spawn(async move {
            load_alerts(&loading, source.as_ref()).await;
        });

        (id, page)
    }

    /// The controller of a live page.
    #[must_use]
    pub fn page(&self, id: &PageId) -> Option<SharedController> {
        self.pages.get(id)
    }
}

/// URL prefix of the API routes belonging to page `id`.
#[must_use]
pub fn page_api_base(id: &PageId) -> String {
    format!("/api/pages/{id}")
}

/// Registers the page and API routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index)).service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/hotspots", web::get().to(handlers::hotspots))
            .service(
                web::scope("/pages/{page_id}")
                    .route("/alerts", web::get().to(handlers::alerts))
                    .route("/state", web::get().to(handlers::page_state))
                    .route("/stats", web::get().to(handlers::stats))
                    .route("/fragments", web::get().to(handlers::fragments))
                    .route("/lookup", web::post().to(handlers::lookup))
                    .route("/select", web::post().to(handlers::select))
                    .route("/banner/dismiss", web::post().to(handlers::dismiss_banner))
                    .route("/map/ready", web::post().to(handlers::map_ready))
                    .route("/map/timeout", web::post().to(handlers::map_timeout))
                    .route("/map/retry", web::post().to(handlers::map_retry)),
            ),
    );
}

/// Starts the flood map server.
///
/// Builds the alert client and the page registry for the configured map
/// adapter, then starts the Actix-Web HTTP server. This is a regular async
/// function: the caller provides the runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the alert client cannot be
/// built, the HTTP server fails to bind, or it encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    if pretty_env_logger::try_init_custom_env("RUST_LOG").is_err() {
        log::debug!("Logger already initialized");
    }

    let source = CkanAlertSource::new(config.alerts.clone()).map_err(std::io::Error::other)?;

    log::info!(
        "Using {} map adapter, keeping up to {} live pages",
        config.adapter,
        config.max_pages
    );
    let state = web::Data::new(AppState::new(&config, Arc::new(source)));

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use async_trait::async_trait;
    use flood_map_alerts::{AlertError, AlertRecord};
    use flood_map_flood_models::catalog;
    use serde_json::{Value, json};

    use super::*;

    /// Serves `size` records per request, tagged with the request number.
    struct Feed {
        size: usize,
        calls: AtomicUsize,
    }

    impl Feed {
        fn new(size: usize) -> Arc<Self> {
            Arc::new(Self {
                size,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl AlertSource for Feed {
        fn label(&self) -> &str {
            "test feed"
        }

        async fn try_fetch(&self) -> Result<Vec<AlertRecord>, AlertError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((0..self.size)
                .map(|i| AlertRecord {
                    location: Some(format!("Feed {call}-{i}")),
                    ..AlertRecord::default()
                })
                .collect())
        }
    }

    fn state_with(kind: AdapterKind, max_pages: usize, feed: Arc<Feed>) -> web::Data<AppState> {
        let config = ServerConfig {
            adapter: kind,
            max_pages,
            ..ServerConfig::default()
        };
        web::Data::new(AppState::new(&config, feed))
    }

    fn state(kind: AdapterKind) -> web::Data<AppState> {
        state_with(kind, 16, Feed::new(0))
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state.clone()).configure(configure)).await
        };
    }

    /// Loads `/` and returns the page's API base and its HTML.
    macro_rules! open_page {
        ($app:expr) => {{
            let body =
                test::call_and_read_body(&$app, test::TestRequest::get().uri("/").to_request())
                    .await;
            let html = String::from_utf8(body.to_vec()).unwrap();
            let start = html.find(r#"data-api=""#).unwrap() + r#"data-api=""#.len();
            let end = start + html[start..].find('"').unwrap();
            (html[start..end].to_string(), html)
        }};
    }

    macro_rules! get_json {
        ($app:expr, $uri:expr) => {{
            let body: Value = test::call_and_read_body_json(
                &$app,
                test::TestRequest::get().uri(&$uri).to_request(),
            )
            .await;
            body
        }};
    }

    macro_rules! post_json {
        ($app:expr, $uri:expr) => {
            post_json!($app, $uri, json!({}))
        };
        ($app:expr, $uri:expr, $body:expr) => {{
            let body: Value = test::call_and_read_body_json(
                &$app,
                test::TestRequest::post()
                    .uri(&$uri)
                    .set_json($body)
                    .to_request(),
            )
            .await;
            body
        }};
    }

    /// Polls the page's fragments until its alert fetch has landed.
    macro_rules! loaded_fragments {
        ($app:expr, $base:expr) => {{
            let mut fragments = Value::Null;
            for _ in 0..100 {
                fragments = get_json!($app, format!("{}/fragments", $base));
                if fragments["alertsLoading"] == false {
                    break;
                }
                actix_rt::time::sleep(Duration::from_millis(5)).await;
            }
            fragments
        }};
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = app!(state(AdapterKind::Leaflet));
        let body = get_json!(app, "/api/health");
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn index_renders_page() {
        let app = app!(state(AdapterKind::Static));
        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        let html = std::str::from_utf8(&body).unwrap();
        assert!(html.contains("Singapore Flood Risk Map"));
        assert!(html.contains("Loading real-time data from PUB..."));
        assert!(html.contains(r#"data-api="/api/pages/"#));
        for hotspot in catalog() {
            assert!(html.contains(hotspot.name));
        }
    }

    #[actix_web::test]
    async fn hotspots_include_risk() {
        let app = app!(state(AdapterKind::Leaflet));
        let body = get_json!(app, "/api/hotspots");
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 5);
        assert_eq!(list[1]["name"], "Bukit Timah");
        assert_eq!(list[1]["riskLevel"], "High Risk");
    }

    #[actix_web::test]
    async fn short_lookup_is_ignored() {
        let app = app!(state(AdapterKind::Leaflet));
        let (base, _) = open_page!(app);
        let body = post_json!(
            app,
            format!("{base}/lookup"),
            json!({"postalCode": "2388"})
        );
        assert!(body["selected"].is_null());
        assert!(get_json!(app, format!("{base}/state"))["selected"].is_null());
    }

    #[actix_web::test]
    async fn lookup_then_map_ready_replays_recenter() {
        let app = app!(state(AdapterKind::Leaflet));
        let (base, _) = open_page!(app);

        let body = post_json!(
            app,
            format!("{base}/lookup"),
            json!({"postalCode": "238839"})
        );
        let name = body["selected"]["name"].as_str().unwrap().to_string();
        assert!(catalog().iter().any(|h| h.name == name));
        assert!(body["mapCommand"].is_null());
        assert!(body["selectedHtml"].as_str().unwrap().contains(&name));

        let ready = post_json!(app, format!("{base}/map/ready"));
        assert_eq!(ready["mapState"], "ready");
        assert_eq!(ready["mapCommand"]["type"], "flyTo");
        assert_eq!(ready["mapCommand"]["zoom"], 14);

        let again = post_json!(
            app,
            format!("{base}/lookup"),
            json!({"postalCode": "049315"})
        );
        assert_eq!(again["mapCommand"]["type"], "flyTo");
    }

    #[actix_web::test]
    async fn pages_do_not_share_state() {
        let app = app!(state(AdapterKind::Leaflet));

        let (tab_a, _) = open_page!(app);
        post_json!(app, format!("{tab_a}/map/ready"));
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("{tab_a}/banner/dismiss"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let (visitor_b, b_html) = open_page!(app);
        assert_ne!(tab_a, visitor_b);
        assert!(b_html.contains(r#"id="info-banner""#));

        let lookup = post_json!(
            app,
            format!("{tab_a}/lookup"),
            json!({"postalCode": "238839"})
        );
        assert_eq!(lookup["mapCommand"]["type"], "flyTo");

        let a = get_json!(app, format!("{tab_a}/state"));
        assert_eq!(a["mapState"], "ready");
        assert_eq!(a["bannerVisible"], false);
        assert!(!a["selected"].is_null());

        let b = get_json!(app, format!("{visitor_b}/state"));
        assert_eq!(b["mapState"], "loading");
        assert_eq!(b["bannerVisible"], true);
        assert!(b["selected"].is_null());

        let b_ready = post_json!(app, format!("{visitor_b}/map/ready"));
        assert!(b_ready["mapCommand"].is_null());

        let (_, c_html) = open_page!(app);
        assert!(c_html.contains(r#"id="info-banner""#));
        assert!(!c_html.contains("card detail"));
    }

    #[actix_web::test]
    async fn each_page_load_fetches_alerts() {
        let feed = Feed::new(1);
        let app = app!(state_with(AdapterKind::Static, 16, Arc::clone(&feed)));

        let (first, _) = open_page!(app);
        let first_fragments = loaded_fragments!(app, first);
        assert_eq!(first_fragments["alertsLoading"], false);
        assert!(first_fragments["alertsHtml"].as_str().unwrap().contains("Feed 0-0"));

        let (second, second_html) = open_page!(app);
        assert!(second_html.contains("Loading real-time data from PUB..."));
        let second_fragments = loaded_fragments!(app, second);
        assert!(second_fragments["alertsHtml"].as_str().unwrap().contains("Feed 1-0"));

        assert_eq!(feed.calls.load(Ordering::SeqCst), 2);
        let first_again = get_json!(app, format!("{first}/fragments"));
        assert!(first_again["alertsHtml"].as_str().unwrap().contains("Feed 0-0"));
    }

    #[actix_web::test]
    async fn fragments_cap_alert_list() {
        let app = app!(state_with(AdapterKind::Leaflet, 16, Feed::new(7)));
        let (base, _) = open_page!(app);

        let body = loaded_fragments!(app, base);
        assert_eq!(body["alertsLoading"], false);
        let alerts_html = body["alertsHtml"].as_str().unwrap();
        assert_eq!(alerts_html.matches("alert-item").count(), 5);
        assert!(body["statsHtml"].as_str().unwrap().contains(">7<"));

        let stats = get_json!(app, format!("{base}/stats"));
        assert_eq!(
            stats,
            json!({"hotspotsTracked": 5, "totalIncidents": 35, "activeAlerts": 7})
        );
        let alerts = get_json!(app, format!("{base}/alerts"));
        assert_eq!(alerts["alerts"].as_array().unwrap().len(), 7);
    }

    #[actix_web::test]
    async fn select_marks_selection() {
        let app = app!(state(AdapterKind::Static));
        let (base, _) = open_page!(app);
        let body = post_json!(app, format!("{base}/select"), json!({"name": "Jurong"}));
        assert_eq!(body["selected"]["incidentFrequency"], 5);
        assert!(body["mapCommand"].is_null());
        let page = get_json!(app, format!("{base}/state"));
        assert_eq!(page["selected"]["name"], "Jurong");
    }

    #[actix_web::test]
    async fn select_unknown_hotspot_is_not_found() {
        let app = app!(state(AdapterKind::Leaflet));
        let (base, _) = open_page!(app);
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("{base}/select"))
                .set_json(json!({"name": "Atlantis"}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn unknown_or_evicted_page_is_not_found() {
        let app = app!(state_with(AdapterKind::Leaflet, 1, Feed::new(0)));

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/pages/00000000-0000-0000-0000-000000000000/state")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let (old, _) = open_page!(app);
        let (new, _) = open_page!(app);
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("{old}/state"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(get_json!(app, format!("{new}/state"))["bannerVisible"], true);
    }

    #[actix_web::test]
    async fn map_timeout_and_retry() {
        let app = app!(state(AdapterKind::Leaflet));
        let (base, _) = open_page!(app);

        let timed_out = post_json!(app, format!("{base}/map/timeout"));
        assert_eq!(timed_out["mapState"], "timedOut");

        let retried = post_json!(app, format!("{base}/map/retry"));
        assert_eq!(retried["mapState"], "loading");

        let page = get_json!(app, format!("{base}/state"));
        assert_eq!(page["mapState"], "loading");
        assert_eq!(page["bannerVisible"], true);
    }
}
