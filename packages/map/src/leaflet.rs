//! Interactive Leaflet map adapter.

use flood_map_flood_models::Hotspot;
use maud::{Markup, PreEscaped, html};
use serde::Serialize;

use crate::html::script_json;
use crate::{AdapterKind, MapAdapter, MapCommand, MapConfig, MapState, Marker, render_legend};

/// Browser bootstrap. `__CONFIG__` and `__MARKERS__` are replaced with JSON.
///
/// Loads the stylesheet and runtime, builds the map once `L` is available,
/// reports `map/ready` under the page's report base (applying any command
/// the server replays), and reports `map/timeout` if the runtime fails to
/// load in time.
const BOOTSTRAP_JS: &str = r#"
(function () {
  var config = __CONFIG__;
  var markers = __MARKERS__;
  var canvas = document.getElementById('flood-map');
  var placeholder = document.getElementById('flood-map-placeholder');
  var retryBox = document.getElementById('flood-map-retry');
  var map = null;
  var timer = null;
  var failed = false;

  function post(path) {
    return fetch(path, { method: 'POST' })
      .then(function (r) { return r.ok ? r.json() : null; })
      .catch(function () { return null; });
  }

  function apply(command) {
    if (!command || !map) return;
    if (command.type === 'flyTo') {
      map.flyTo([command.latitude, command.longitude], command.zoom, { animate: command.animate });
    }
  }

  function popupFor(m) {
    var root = document.createElement('div');
    var title = document.createElement('strong');
    title.textContent = m.name;
    root.appendChild(title);
    var line = document.createElement('div');
    line.className = m.riskColor;
    line.textContent = m.incidents + ' incidents · ' + m.riskLabel;
    root.appendChild(line);
    return root;
  }

  function build() {
    if (map) return;
    clearTimeout(timer);
    placeholder.hidden = true;
    retryBox.hidden = true;
    map = L.map(canvas).setView(config.center, config.zoom);
    L.tileLayer(config.tileUrl, { attribution: config.tileAttribution, maxZoom: 19 }).addTo(map);
    markers.forEach(function (m) {
      var icon = L.divIcon({
        className: 'flood-marker',
        html: '<span class=\'marker-pin pin-' + m.color + (m.emphasized ? ' pulse' : '') + '\'></span>',
        iconSize: [24, 24],
        iconAnchor: [12, 24],
        popupAnchor: [0, -24]
      });
      var marker = L.marker([m.latitude, m.longitude], { icon: icon, title: m.name }).addTo(map);
      marker.bindPopup(popupFor(m));
      marker.on('click', function () {
        document.dispatchEvent(new CustomEvent('floodmap:select', { detail: m.name }));
      });
      if (m.emphasized) {
        L.circle([m.latitude, m.longitude], {
          radius: config.emphasisRadius,
          color: '#ef4444',
          fillColor: '#ef4444',
          fillOpacity: 0.15,
          weight: 1
        }).addTo(map);
      }
    });
    post(config.reportBase + '/map/ready').then(function (body) { apply(body && body.mapCommand); });
  }

  function fail() {
    if (map || failed) return;
    failed = true;
    clearTimeout(timer);
    placeholder.hidden = true;
    retryBox.hidden = false;
    post(config.reportBase + '/map/timeout');
  }

  function load() {
    failed = false;
    placeholder.hidden = false;
    retryBox.hidden = true;
    if (!document.querySelector('link[data-leaflet]')) {
      var link = document.createElement('link');
      link.rel = 'stylesheet';
      link.href = config.cssUrl;
      link.setAttribute('data-leaflet', '');
      document.head.appendChild(link);
    }
    var script = document.createElement('script');
    script.src = config.jsUrl;
    script.async = true;
    script.onload = build;
    script.onerror = fail;
    document.head.appendChild(script);
    timer = setTimeout(fail, config.loadTimeoutMs);
  }

  document.getElementById('flood-map-retry-button').addEventListener('click', function () {
    post(config.reportBase + '/map/retry').then(load);
  });
  document.addEventListener('floodmap:command', function (e) { apply(e.detail); });

  if (window.L) { build(); } else { load(); }
})();
"#;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BootConfig<'a> {
    center: [f64; 2],
    zoom: u8,
    tile_url: &'a str,
    tile_attribution: &'a str,
    css_url: &'a str,
    js_url: &'a str,
    load_timeout_ms: u64,
    emphasis_radius: f64,
    report_base: &'a str,
}

/// Renders hotspots on a Leaflet map loaded from its CDN.
pub struct LeafletAdapter {
    config: MapConfig,
}

impl LeafletAdapter {
    #[must_use]
    pub const fn new(config: MapConfig) -> Self {
        Self { config }
    }

    fn boot_config<'a>(&'a self, report_base: &'a str) -> BootConfig<'a> {
        let c = &self.config;
        BootConfig {
            center: [c.center.0, c.center.1],
            zoom: c.zoom,
            tile_url: &c.tile_url,
            tile_attribution: &c.tile_attribution,
            css_url: &c.leaflet_css_url,
            js_url: &c.leaflet_js_url,
            load_timeout_ms: u64::try_from(c.load_timeout.as_millis()).unwrap_or(u64::MAX),
            emphasis_radius: c.emphasis_radius_m,
            report_base,
        }
    }
}

impl MapAdapter for LeafletAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Leaflet
    }

    fn requires_runtime(&self) -> bool {
        true
    }

    fn render(&self, hotspots: &[Hotspot], state: MapState, report_base: &str) -> Markup {
        let markers: Vec<Marker> = hotspots.iter().map(Marker::from).collect();
        let script = BOOTSTRAP_JS
            .replace(
                "__CONFIG__",
                &script_json(&self.boot_config(report_base)).into_string(),
            )
            .replace("__MARKERS__", &script_json(&markers).into_string());

        let (placeholder_hidden, retry_hidden) = match state {
            MapState::Loading => (false, true),
            MapState::Ready => (true, true),
            MapState::TimedOut => (true, false),
        };

        html! {
            div class="map-frame" data-adapter="leaflet" data-state=(state.to_string()) {
                div id="flood-map" class="map-canvas" {}
                div id="flood-map-placeholder" class="map-placeholder" hidden[placeholder_hidden] {
                    "Loading map..."
                }
                div id="flood-map-retry" class="map-retry" hidden[retry_hidden] {
                    p { "The map could not be loaded." }
                    button type="button" id="flood-map-retry-button" { "Retry" }
                }
                (render_legend())
            }
            script { (PreEscaped(script)) }
        }
    }

    fn recenter(&self, hotspot: &Hotspot) -> Option<MapCommand> {
        Some(MapCommand::FlyTo {
            latitude: hotspot.latitude,
            longitude: hotspot.longitude,
            zoom: self.config.focus_zoom,
            animate: true,
        })
    }
}
