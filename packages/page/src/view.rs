//! HTML views. Every function here is a pure function of its arguments.
//!
//! The fragments with stable element IDs (`selected-area`, `alert-list`,
//! `stats`) are also served on their own so the page script can swap them
//! in place after a lookup, a marker click, or the alert feed arriving.

use flood_map_flood_models::Severity;
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::state::{AlertFeedState, PageSnapshot, PageStats, SelectedArea};

/// Title used for the document and the share sheet.
pub const PAGE_TITLE: &str = "Singapore Flood Risk Map";

/// Text passed to the platform share capability.
pub const SHARE_TEXT: &str = "Check your neighborhood flood risk and stay prepared!";

const PREPAREDNESS_TIPS: &[&str] = &[
    "Monitor weather forecasts closely",
    "Prepare emergency supplies",
    "Know evacuation routes",
    "Subscribe to PUB alerts",
];

/// Renders the complete document.
///
/// `api_base` is the URL prefix of this page's own API routes; the page
/// script sends every lookup, selection, and poll under it.
#[must_use]
pub fn render_page(snapshot: &PageSnapshot, map: &Markup, api_base: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (PAGE_TITLE) }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body data-api=(api_base)
                data-alerts-loading=(snapshot.alerts.is_loading().to_string())
                data-phase=(snapshot.phase().to_string()) {
                (render_header())
                @if snapshot.banner_visible {
                    (render_banner())
                }
                main class="layout" {
                    section class="side" {
                        (render_search())
                        div id="selected-area" { (render_selected(snapshot.selected.as_ref())) }
                        (render_actions())
                    }
                    section class="content" {
                        div class="card" {
                            h2 { "Historical Flood Hotspots" }
                            (map)
                        }
                        div class="card" {
                            h2 { "Real-time Flood Alerts" }
                            div id="alert-list" { (render_alerts(&snapshot.alerts)) }
                            p class="fine" { "Data provided by PUB Singapore | Updated in real-time" }
                        }
                        div id="stats" { (render_stats(&snapshot.stats)) }
                    }
                }
                (render_footer())
                script { (PreEscaped(PAGE_JS.replace("__SHARE_TEXT__", SHARE_TEXT))) }
            }
        }
    }
}

fn render_header() -> Markup {
    html! {
        header class="banner-header" {
            h1 { (PAGE_TITLE) }
            p { "#30DaysMapChallenge | Real-time data from PUB Singapore" }
        }
    }
}

fn render_banner() -> Markup {
    html! {
        div id="info-banner" class="info-banner" {
            div {
                p class="strong" { "Know Your Flood Risk" }
                p {
                    "This map combines real-time flood alerts with historical data to help you "
                    "understand and prepare for flooding in your area."
                }
            }
            button type="button" id="dismiss-banner" aria-label="Dismiss" { "\u{2715}" }
        }
    }
}

fn render_search() -> Markup {
    html! {
        form id="postal-search" class="card" {
            h2 { "Check Your Area" }
            input type="text" name="postalCode" placeholder="Enter postal code (e.g. 238839)"
                maxlength="6" autocomplete="postal-code";
            button type="submit" class="primary" { "Check Risk Level" }
        }
    }
}

/// Renders the selected-area card, or nothing when no area is selected.
#[must_use]
pub fn render_selected(selected: Option<&SelectedArea>) -> Markup {
    let Some(area) = selected else {
        return html! {};
    };
    let border = match area.hotspot.severity {
        Severity::High => "border-red",
        Severity::Medium | Severity::Low => "border-orange",
    };

    html! {
        div class={ "card detail " (border) } {
            h3 { (area.hotspot.name) }
            span class={ "pill " (area.risk.background_token) " " (area.risk.color_token) } {
                (area.risk.label)
            }
            p {
                strong { (area.hotspot.incident_frequency) }
                " flood incidents in past 10 years"
            }
            p class="muted" { strong { "What you can do:" } }
            ul class="muted" {
                @for tip in PREPAREDNESS_TIPS {
                    li { (tip) }
                }
            }
        }
    }
}

fn render_actions() -> Markup {
    html! {
        div class="card cta" {
            h3 { "Stay Prepared" }
            button type="button" class="light" { "Download Emergency Kit Guide" }
            button type="button" id="share-map" class="accent" { "Share with Your Community" }
            p id="share-notice" class="notice" hidden { "Link copied to clipboard" }
        }
    }
}

/// Renders the alert list body: a loading line, up to five alerts, or the
/// all-clear state.
#[must_use]
pub fn render_alerts(alerts: &AlertFeedState) -> Markup {
    if alerts.is_loading() {
        return html! {
            div class="placeholder" { "Loading real-time data from PUB..." }
        };
    }

    let visible = alerts.visible();
    if visible.is_empty() {
        return html! {
            div class="all-clear" {
                p class="strong" { "\u{2713} No active flood alerts" }
                p class="muted" { "All clear across Singapore" }
            }
        };
    }

    html! {
        div class="alerts" {
            @for alert in visible {
                div class="alert-item" {
                    p class="strong" { (alert.location_or_placeholder()) }
                    p class="muted" { "Status: " (alert.status_or_placeholder()) }
                }
            }
        }
    }
}

/// Renders the three statistics tiles.
#[must_use]
pub fn render_stats(stats: &PageStats) -> Markup {
    html! {
        div class="tiles" {
            div class="tile" {
                p class="figure text-blue-600" { (stats.hotspots_tracked) }
                p class="muted" { "Hotspots Tracked" }
            }
            div class="tile" {
                p class="figure text-orange-600" { (stats.total_incidents) }
                p class="muted" { "Total Incidents (10yr)" }
            }
            div class="tile" {
                p class="figure text-green-600" { (stats.active_alerts) }
                p class="muted" { "Active Alerts" }
            }
        }
    }
}

fn render_footer() -> Markup {
    html! {
        footer {
            p { "Created for #30DaysMapChallenge 2024 | Theme: Water" }
            p class="dim" { "Data sources: PUB Singapore Real-time Flood API, Data.gov.sg" }
            p class="dim" {
                "Special thanks to Open Government Products (OGP) for enabling public access to critical data"
            }
        }
    }
}

const PAGE_CSS: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, sans-serif; background: linear-gradient(135deg, #eff6ff, #f1f5f9); color: #0f172a; }
.banner-header { background: linear-gradient(90deg, #2563eb, #1e40af); color: #fff; padding: 1.5rem; }
.banner-header h1 { margin: 0 0 .5rem; font-size: 1.875rem; }
.banner-header p { margin: 0; color: #dbeafe; font-size: .875rem; }
.info-banner { display: flex; justify-content: space-between; gap: 1rem; background: #dbeafe; border-left: 4px solid #2563eb; margin: 1rem; padding: 1rem; border-radius: .25rem; font-size: .875rem; }
.info-banner button { background: none; border: 0; color: #2563eb; cursor: pointer; }
.layout { max-width: 72rem; margin: 0 auto; padding: 1rem; display: grid; grid-template-columns: 1fr 2fr; gap: 1rem; }
@media (max-width: 64rem) { .layout { grid-template-columns: 1fr; } }
.side, .content { display: flex; flex-direction: column; gap: 1rem; }
.card { background: #fff; border-radius: .5rem; box-shadow: 0 4px 12px rgba(15, 23, 42, .1); padding: 1.5rem; }
.card h2 { margin-top: 0; font-size: 1.25rem; }
.card input { width: 100%; padding: .5rem 1rem; border: 1px solid #d1d5db; border-radius: .5rem; margin-bottom: .75rem; }
button.primary, .cta button { width: 100%; padding: .5rem; border: 0; border-radius: .5rem; cursor: pointer; margin-bottom: .5rem; }
button.primary { background: #2563eb; color: #fff; }
.detail { border-left: 4px solid; }
.border-red { border-color: #ef4444; }
.border-orange { border-color: #f97316; }
.pill { display: inline-block; padding: .25rem .75rem; border-radius: 9999px; font-size: .875rem; font-weight: 600; }
.cta { background: linear-gradient(135deg, #2563eb, #1e40af); color: #fff; }
.cta button.light { background: #fff; color: #2563eb; font-weight: 600; }
.cta button.accent { background: #3b82f6; color: #fff; }
.notice { font-size: .875rem; color: #dbeafe; }
.map-frame { position: relative; height: 24rem; border-radius: .5rem; overflow: hidden; background: linear-gradient(135deg, #dbeafe, #e2e8f0); }
.map-canvas { position: absolute; inset: 0; }
.map-placeholder, .map-retry { position: absolute; inset: 0; display: flex; flex-direction: column; align-items: center; justify-content: center; color: #6b7280; z-index: 500; }
[hidden] { display: none !important; }
.map-legend { position: absolute; bottom: 1rem; left: 1rem; background: rgba(255, 255, 255, .9); padding: .75rem; border-radius: .25rem; font-size: .75rem; z-index: 600; }
.legend-title { font-weight: 600; margin: 0 0 .5rem; }
.legend-row { display: flex; align-items: center; gap: .5rem; }
.legend-dot { width: 1rem; height: 1rem; border-radius: 9999px; display: inline-block; }
.dot-red, .pin-red { background: #ef4444; }
.dot-orange, .pin-orange { background: #f97316; }
.dot-yellow, .pin-yellow { background: #eab308; }
.marker-pin { display: block; width: 24px; height: 24px; border-radius: 50% 50% 50% 0; transform: rotate(-45deg); border: 2px solid #fff; }
.pin { position: absolute; transform: translate(-50%, -50%); background: none; border: 0; cursor: pointer; }
.pin-halo { position: absolute; inset: -1rem; border-radius: 9999px; opacity: .2; }
.halo-red { background: #ef4444; }
.halo-orange { background: #f97316; }
.halo-yellow { background: #eab308; }
.pulse { animation: pulse 2s infinite; }
@keyframes pulse { 50% { opacity: .5; } }
.pin-tooltip { display: none; position: absolute; top: 2.5rem; left: 50%; transform: translateX(-50%); background: #fff; padding: .5rem .75rem; border-radius: .25rem; white-space: nowrap; box-shadow: 0 4px 12px rgba(15, 23, 42, .15); }
.pin:hover .pin-tooltip { display: flex; flex-direction: column; }
.placeholder { text-align: center; padding: 2rem; color: #6b7280; }
.all-clear { text-align: center; padding: 2rem; color: #16a34a; background: #f0fdf4; border-radius: .5rem; }
.alerts { display: flex; flex-direction: column; gap: .75rem; max-height: 16rem; overflow-y: auto; }
.alert-item { border-left: 4px solid #3b82f6; background: #eff6ff; padding: 1rem; border-radius: .25rem; }
.alert-item p { margin: 0; }
.tiles { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; }
.tile { background: #fff; border-radius: .5rem; padding: 1rem; text-align: center; box-shadow: 0 1px 4px rgba(15, 23, 42, .1); }
.figure { font-size: 1.875rem; font-weight: 700; margin: 0; }
.strong { font-weight: 600; }
.muted { color: #4b5563; font-size: .875rem; }
.fine { color: #6b7280; font-size: .75rem; text-align: center; }
.dim { color: #9ca3af; }
footer { background: #1f2937; color: #fff; padding: 1.5rem; margin-top: 2rem; text-align: center; font-size: .875rem; }
.text-red-600 { color: #dc2626; } .bg-red-50 { background: #fef2f2; }
.text-orange-600 { color: #ea580c; } .bg-orange-50 { background: #fff7ed; }
.text-yellow-600 { color: #ca8a04; } .bg-yellow-50 { background: #fefce8; }
.text-blue-600 { color: #2563eb; } .text-green-600 { color: #16a34a; }
"#;

const PAGE_JS: &str = r#"
(function () {
  var api = document.body.getAttribute('data-api');

  function send(method, path, body) {
    var init = { method: method, headers: {} };
    if (body !== undefined) {
      init.headers['Content-Type'] = 'application/json';
      init.body = JSON.stringify(body);
    }
    return fetch(path, init)
      .then(function (r) { return r.ok ? r.json() : null; })
      .catch(function () { return null; });
  }

  function showSelection(response) {
    if (!response) return;
    if (typeof response.selectedHtml === 'string') {
      document.getElementById('selected-area').innerHTML = response.selectedHtml;
    }
    if (response.mapCommand) {
      document.dispatchEvent(new CustomEvent('floodmap:command', { detail: response.mapCommand }));
    }
  }

  function select(name) {
    send('POST', api + '/select', { name: name }).then(showSelection);
  }

  var banner = document.getElementById('dismiss-banner');
  if (banner) {
    banner.addEventListener('click', function () {
      var el = document.getElementById('info-banner');
      if (el) el.remove();
      send('POST', api + '/banner/dismiss');
    });
  }

  document.getElementById('postal-search').addEventListener('submit', function (e) {
    e.preventDefault();
    var code = e.target.elements.postalCode.value;
    if (code.trim().length < 6) return;
    send('POST', api + '/lookup', { postalCode: code }).then(showSelection);
  });

  document.addEventListener('floodmap:select', function (e) { select(e.detail); });
  document.querySelectorAll('[data-hotspot]').forEach(function (pin) {
    pin.addEventListener('click', function () { select(pin.getAttribute('data-hotspot')); });
  });

  document.getElementById('share-map').addEventListener('click', function () {
    var data = { title: document.title, text: '__SHARE_TEXT__', url: window.location.href };
    if (navigator.share) {
      navigator.share(data).catch(function () {});
      return;
    }
    if (navigator.clipboard) {
      navigator.clipboard.writeText(data.url).then(function () {
        document.getElementById('share-notice').hidden = false;
      });
    }
  });

  function pollAlerts() {
    send('GET', api + '/fragments').then(function (f) {
      if (f === null) return;
      if (f.alertsLoading) {
        setTimeout(pollAlerts, 1000);
        return;
      }
      document.getElementById('alert-list').innerHTML = f.alertsHtml;
      document.getElementById('stats').innerHTML = f.statsHtml;
      document.body.setAttribute('data-alerts-loading', 'false');
    });
  }
  if (document.body.getAttribute('data-alerts-loading') === 'true') pollAlerts();
})();
"#;

#[cfg(test)]
mod tests {
    use flood_map_alerts_models::AlertRecord;
    use flood_map_flood_models::{catalog, find_by_name};
    use flood_map_map::MapState;

    use super::*;

    fn snapshot(alerts: AlertFeedState, banner_visible: bool) -> PageSnapshot {
        let stats = PageStats {
            hotspots_tracked: catalog().len(),
            total_incidents: 35,
            active_alerts: alerts.records().len(),
        };
        PageSnapshot {
            hotspots: catalog(),
            alerts,
            map: MapState::Loading,
            selected: None,
            banner_visible,
            stats,
        }
    }

    fn page(snapshot: &PageSnapshot, map: Markup) -> String {
        render_page(snapshot, &map, "/api/pages/test").into_string()
    }

    fn named(n: usize) -> Vec<AlertRecord> {
        (0..n)
            .map(|i| AlertRecord {
                location: Some(format!("Canal {i}")),
                status: Some("Rising".to_string()),
                ..AlertRecord::default()
            })
            .collect()
    }

    #[test]
    fn loading_alerts_show_loading_line() {
        let html = render_alerts(&AlertFeedState::Loading).into_string();
        assert!(html.contains("Loading real-time data from PUB..."));
    }

    #[test]
    fn empty_alerts_show_all_clear() {
        let html = render_alerts(&AlertFeedState::Loaded(Vec::new())).into_string();
        assert!(html.contains("No active flood alerts"));
        assert!(!html.contains("alert-item"));
    }

    #[test]
    fn renders_up_to_five_alerts_in_order() {
        let html = render_alerts(&AlertFeedState::Loaded(named(3))).into_string();
        assert_eq!(html.matches("alert-item").count(), 3);
        let first = html.find("Canal 0").unwrap();
        let last = html.find("Canal 2").unwrap();
        assert!(first < last);

        let html = render_alerts(&AlertFeedState::Loaded(named(9))).into_string();
        assert_eq!(html.matches("alert-item").count(), 5);
        assert!(html.contains("Canal 4"));
        assert!(!html.contains("Canal 5"));
    }

    #[test]
    fn absent_fields_use_placeholders() {
        let html = render_alerts(&AlertFeedState::Loaded(vec![AlertRecord::default()])).into_string();
        assert!(html.contains("Location data pending"));
        assert!(html.contains("Status: Monitoring"));
    }

    #[test]
    fn feed_text_is_escaped() {
        let record = AlertRecord {
            location: Some("<img src=x onerror=alert(1)>".to_string()),
            status: Some("\"high\" & rising".to_string()),
            ..AlertRecord::default()
        };
        let html = render_alerts(&AlertFeedState::Loaded(vec![record])).into_string();
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img"));
        assert!(html.contains("&quot;high&quot; &amp; rising"));
    }

    #[test]
    fn stats_tiles_show_values() {
        let html = render_stats(&PageStats {
            hotspots_tracked: 5,
            total_incidents: 35,
            active_alerts: 12,
        })
        .into_string();
        assert!(html.contains(">5<"));
        assert!(html.contains(">35<"));
        assert!(html.contains(">12<"));
    }

    #[test]
    fn selected_card_shows_risk_and_tips() {
        let area = SelectedArea::from(*find_by_name("Bukit Timah").unwrap());
        let html = render_selected(Some(&area)).into_string();
        assert!(html.contains("Bukit Timah"));
        assert!(html.contains("High Risk"));
        assert!(html.contains(r#"class="pill bg-red-50 text-red-600""#));
        assert!(html.contains(r#"class="card detail border-red""#));
        assert!(html.contains("<strong>12</strong> flood incidents"));
        assert!(html.contains("<li>Subscribe to PUB alerts</li>"));

        let area = SelectedArea::from(*find_by_name("Changi").unwrap());
        let html = render_selected(Some(&area)).into_string();
        assert!(html.contains("Lower Risk"));
        assert!(html.contains("border-orange"));
    }

    #[test]
    fn no_selection_renders_nothing() {
        assert!(render_selected(None).into_string().is_empty());
    }

    #[test]
    fn banner_follows_snapshot() {
        let shown = page(&snapshot(AlertFeedState::Loading, true), html! {});
        assert!(shown.contains(r#"id="info-banner""#));
        let hidden = page(&snapshot(AlertFeedState::Loading, false), html! {});
        assert!(!hidden.contains(r#"id="info-banner""#));
    }

    #[test]
    fn page_embeds_map_and_loading_flag() {
        let html = page(
            &snapshot(AlertFeedState::Loading, true),
            html! { div id="map-slot" {} },
        );
        assert!(html.contains(r#"<div id="map-slot"></div>"#));
        assert!(html.contains(r#"data-api="/api/pages/test""#));
        assert!(html.contains(r#"data-alerts-loading="true""#));
        assert!(html.contains(r#"data-phase="alertsLoadingMapLoading""#));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn page_script_addresses_own_routes() {
        let html = page(&snapshot(AlertFeedState::Loaded(Vec::new()), true), html! {});
        assert!(html.contains("api + '/lookup'"));
        assert!(!html.contains("'/api/lookup'"));
        assert!(html.contains(SHARE_TEXT));
        assert!(!html.contains("__SHARE_TEXT__"));
    }
}
