//! Chart/Map Adapter
//!
//! Turns analytics snapshots into chart and map instances. The drawing
//! libraries live behind [`ChartSurface`] and [`MapSurface`]; the default
//! surfaces record the instances and emit the equivalent browser script
//! (Chart.js, Leaflet, Google GeoChart).

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::client::{HourBucket, LocationCount};
use crate::electoral::StateResult;
use crate::render::escape;

/// Canvas element of the hourly traffic chart
pub const TRAFFIC_CANVAS: &str = "trafficChart";

/// Canvas element of the location doughnut
pub const LOCATION_CANVAS: &str = "locationChart";

/// Element hosting the visitor map
pub const MAP_ELEMENT: &str = "worldMap";

/// Initial map view
pub const MAP_CENTRE: (f64, f64) = (20.0, 0.0);
pub const MAP_ZOOM: u8 = 2;

const DOUGHNUT_COLOURS: [&str; 5] = ["#6C63FF", "#FF6584", "#3B82F6", "#10B981", "#F59E0B"];

/// Opaque id of a live chart instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChartHandle(Uuid);

impl ChartHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChartHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Chart.js configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Value,
    pub options: Value,
}

/// A map pin
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    pub popup: String,
}

/// Something that can draw charts
pub trait ChartSurface: Send {
    fn create(&mut self, canvas: &str, config: &ChartConfig) -> ChartHandle;
    fn destroy(&mut self, handle: ChartHandle);
}

/// Something that can show a marker map
pub trait MapSurface: Send {
    fn init(&mut self, element: &str, centre: (f64, f64), zoom: u8);
    fn clear_markers(&mut self);
    fn add_marker(&mut self, marker: Marker);
}

/// Hourly counts in 24 slots `"00".."23"`.
///
/// The first bucket for an hour wins; hours without a bucket are zero.
pub fn normalize_hourly(buckets: &[HourBucket]) -> Vec<(String, u64)> {
    (0..24)
        .map(|hour| {
            let label = format!("{:02}", hour);
            let count = buckets
                .iter()
                .find(|b| b.hour.as_deref() == Some(label.as_str()))
                .map(|b| b.count)
                .unwrap_or(0);
            (label, count)
        })
        .collect()
}

/// Owns the dashboard's chart instances and map
pub struct ChartAdapter<C: ChartSurface, M: MapSurface> {
    charts: C,
    map: M,
    traffic: Option<ChartHandle>,
    locations: Option<ChartHandle>,
    map_ready: bool,
}

impl<C: ChartSurface, M: MapSurface> ChartAdapter<C, M> {
    pub fn new(charts: C, map: M) -> Self {
        Self {
            charts,
            map,
            traffic: None,
            locations: None,
            map_ready: false,
        }
    }

    pub fn charts(&self) -> &C {
        &self.charts
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    /// Line chart of activity per hour, replacing the previous one
    pub fn render_traffic_chart(&mut self, buckets: &[HourBucket]) -> ChartHandle {
        let (labels, counts): (Vec<_>, Vec<_>) = normalize_hourly(buckets).into_iter().unzip();

        let config = ChartConfig {
            kind: "line".to_string(),
            data: json!({
                "labels": labels,
                "datasets": [{
                    "label": "Activity",
                    "data": counts,
                    "borderColor": "#6C63FF",
                    "backgroundColor": "rgba(108, 99, 255, 0.2)",
                    "tension": 0.4,
                    "fill": true
                }]
            }),
            options: json!({
                "responsive": true,
                "plugins": { "legend": { "display": false } },
                "scales": {
                    "y": { "grid": { "color": "rgba(255,255,255,0.1)" } },
                    "x": { "grid": { "display": false } }
                }
            }),
        };

        if let Some(old) = self.traffic.take() {
            self.charts.destroy(old);
        }
        let handle = self.charts.create(TRAFFIC_CANVAS, &config);
        self.traffic = Some(handle);
        handle
    }

    /// Doughnut of visits per location, replacing the previous one
    pub fn render_location_chart(&mut self, locations: &[LocationCount]) -> ChartHandle {
        let labels: Vec<&str> = locations
            .iter()
            .map(|l| l.location.as_deref().unwrap_or("Unknown"))
            .collect();
        let counts: Vec<u64> = locations.iter().map(|l| l.count).collect();

        let config = ChartConfig {
            kind: "doughnut".to_string(),
            data: json!({
                "labels": labels,
                "datasets": [{
                    "data": counts,
                    "backgroundColor": DOUGHNUT_COLOURS,
                    "borderWidth": 0
                }]
            }),
            options: json!({
                "responsive": true,
                "plugins": { "legend": { "position": "bottom", "labels": { "color": "#ccc" } } }
            }),
        };

        if let Some(old) = self.locations.take() {
            self.charts.destroy(old);
        }
        let handle = self.charts.create(LOCATION_CANVAS, &config);
        self.locations = Some(handle);
        handle
    }

    /// Replace every marker with one per location that has coordinates.
    ///
    /// The map itself is created on the first call only.
    pub fn render_map(&mut self, locations: &[LocationCount]) -> usize {
        if !self.map_ready {
            self.map.init(MAP_ELEMENT, MAP_CENTRE, MAP_ZOOM);
            self.map_ready = true;
        }

        self.map.clear_markers();

        let mut added = 0;
        for location in locations {
            let Some((latitude, longitude)) = location.coordinates() else {
                continue;
            };
            self.map.add_marker(Marker {
                latitude,
                longitude,
                popup: format!(
                    "<b>{}</b><br>Visits: {}",
                    escape(location.location.as_deref().unwrap_or("Unknown")),
                    location.count
                ),
            });
            added += 1;
        }
        added
    }
}

/// JSON safe to embed inside a `<script>` element
fn script_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

/// Chart surface that keeps live configs and emits Chart.js calls
#[derive(Debug, Default)]
pub struct ScriptCanvas {
    live: BTreeMap<ChartHandle, (String, ChartConfig)>,
    created: usize,
}

impl ScriptCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Charts currently alive
    pub fn live(&self) -> usize {
        self.live.len()
    }

    /// Charts ever created
    pub fn created(&self) -> usize {
        self.created
    }

    /// Config of the live chart on a canvas
    pub fn config_for(&self, canvas: &str) -> Option<&ChartConfig> {
        self.live
            .values()
            .find(|(c, _)| c == canvas)
            .map(|(_, config)| config)
    }

    pub fn script(&self) -> String {
        self.live
            .values()
            .map(|(canvas, config)| {
                format!(
                    "new Chart(document.getElementById('{}').getContext('2d'), {});",
                    canvas,
                    script_json(config)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ChartSurface for ScriptCanvas {
    fn create(&mut self, canvas: &str, config: &ChartConfig) -> ChartHandle {
        let handle = ChartHandle::new();
        self.live.insert(handle, (canvas.to_string(), config.clone()));
        self.created += 1;
        handle
    }

    fn destroy(&mut self, handle: ChartHandle) {
        self.live.remove(&handle);
    }
}

/// Map surface that keeps markers and emits Leaflet calls
#[derive(Debug, Default)]
pub struct LeafletMap {
    view: Option<(String, (f64, f64), u8)>,
    inits: usize,
    markers: Vec<Marker>,
}

impl LeafletMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Times the map was initialised
    pub fn inits(&self) -> usize {
        self.inits
    }

    pub fn script(&self) -> String {
        let Some((element, (lat, lon), zoom)) = &self.view else {
            return String::new();
        };

        let mut script = format!(
            "var map = L.map('{element}').setView([{lat}, {lon}], {zoom});\nL.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{attribution: '&copy; OpenStreetMap contributors'}}).addTo(map);"
        );
        for marker in &self.markers {
            script.push_str(&format!(
                "\nL.marker([{}, {}]).addTo(map).bindPopup({});",
                marker.latitude,
                marker.longitude,
                script_json(&marker.popup)
            ));
        }
        script
    }
}

impl MapSurface for LeafletMap {
    fn init(&mut self, element: &str, centre: (f64, f64), zoom: u8) {
        self.view = Some((element.to_string(), centre, zoom));
        self.inits += 1;
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
    }

    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }
}

/// One state on the region map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRow {
    pub code: String,
    pub bucket: u8,
    pub tooltip: String,
}

/// GeoChart data for the parties page
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMap {
    pub rows: Vec<RegionRow>,
}

impl RegionMap {
    pub fn options() -> Value {
        json!({
            "region": "IN",
            "domain": "IN",
            "displayMode": "regions",
            "resolution": "provinces",
            "colorAxis": {
                "colors": ["#e5e7eb", "#ff9933", "#00BFFF", "#22c55e", "#a855f7"],
                "minValue": 0,
                "maxValue": 4
            },
            "backgroundColor": { "fill": "transparent" },
            "datalessRegionColor": "#e5e7eb",
            "defaultColor": "#f5f5f5",
            "legend": "none",
            "tooltip": { "isHtml": true },
            "keepAspectRatio": true,
            "width": "100%"
        })
    }

    /// GeoChart drawing script; selecting a state calls `openStateModal(code)`
    pub fn script(&self, element: &str) -> String {
        let rows: Vec<Value> = self
            .rows
            .iter()
            .map(|r| json!([r.code, r.bucket, r.tooltip]))
            .collect();

        format!(
            r#"google.charts.load('current', {{packages: ['geochart']}});
google.charts.setOnLoadCallback(function () {{
    var data = new google.visualization.DataTable();
    data.addColumn('string', 'State Code');
    data.addColumn('number', 'Seats');
    data.addColumn({{type: 'string', role: 'tooltip', p: {{html: true}}}});
    data.addRows({rows});
    var chart = new google.visualization.GeoChart(document.getElementById('{element}'));
    google.visualization.events.addListener(chart, 'select', function () {{
        var selection = chart.getSelection();
        if (selection.length > 0) openStateModal(data.getValue(selection[0].row, 0));
    }});
    chart.draw(data, {options});
}});"#,
            rows = script_json(&rows),
            options = script_json(&Self::options()),
        )
    }
}

/// Region map rows: state code, colour bucket and tooltip
pub fn render_region_map(states: &[StateResult]) -> RegionMap {
    RegionMap {
        rows: states
            .iter()
            .map(|state| RegionRow {
                code: state.code.to_string(),
                bucket: state.bucket().value(),
                tooltip: crate::render::parties::render_region_tooltip(state),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::StatsSnapshot;

    fn adapter() -> ChartAdapter<ScriptCanvas, LeafletMap> {
        ChartAdapter::new(ScriptCanvas::new(), LeafletMap::new())
    }

    fn snapshot(json: &str) -> StatsSnapshot {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_normalize_hourly() {
        let stats = snapshot(
            r#"{"traffic_by_hour": [{"hour": "05", "count": 4}, {"hour": "05", "count": 9}, {"hour": "23", "count": 1}]}"#,
        );
        let slots = normalize_hourly(&stats.traffic_by_hour);

        assert_eq!(slots.len(), 24);
        assert_eq!(slots[0], ("00".to_string(), 0));
        assert_eq!(slots[5], ("05".to_string(), 4));
        assert_eq!(slots[23], ("23".to_string(), 1));
    }

    #[test]
    fn test_normalize_hourly_empty() {
        assert!(normalize_hourly(&[]).iter().all(|(_, count)| *count == 0));
    }

    #[test]
    fn test_one_marker_for_one_valid_location() {
        let stats = snapshot(
            r#"{"top_locations": [{"latitude": 1, "longitude": 2, "location": "X", "count": 5}, {"location": "Y", "count": 3}]}"#,
        );
        let mut charts = adapter();

        assert_eq!(charts.render_map(&stats.top_locations), 1);
        let markers = charts.map().markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].popup, "<b>X</b><br>Visits: 5");
        assert_eq!((markers[0].latitude, markers[0].longitude), (1.0, 2.0));
    }

    #[test]
    fn test_map_initialised_once_and_markers_replaced() {
        let stats = snapshot(
            r#"{"top_locations": [{"latitude": 10, "longitude": 20, "location": "A", "count": 1}]}"#,
        );
        let mut charts = adapter();

        charts.render_map(&stats.top_locations);
        charts.render_map(&stats.top_locations);

        assert_eq!(charts.map().inits(), 1);
        assert_eq!(charts.map().markers().len(), 1);
    }

    #[test]
    fn test_chart_rerender_destroys_previous() {
        let mut charts = adapter();

        let first = charts.render_traffic_chart(&[]);
        let second = charts.render_traffic_chart(&[]);
        charts.render_location_chart(&[]);

        assert_ne!(first, second);
        assert_eq!(charts.charts().created(), 3);
        assert_eq!(charts.charts().live(), 2);
    }

    #[test]
    fn test_location_chart_labels() {
        let stats = snapshot(r#"{"top_locations": [{"location": "Pune", "count": 2}, {"count": 1}]}"#);
        let mut charts = adapter();
        charts.render_location_chart(&stats.top_locations);

        let config = charts.charts().config_for(LOCATION_CANVAS).unwrap();
        assert_eq!(config.kind, "doughnut");
        assert_eq!(config.data["labels"], json!(["Pune", "Unknown"]));
    }

    #[test]
    fn test_scripts_escape_closing_tags() {
        let mut map = LeafletMap::new();
        map.init(MAP_ELEMENT, MAP_CENTRE, MAP_ZOOM);
        map.add_marker(Marker {
            latitude: 1.0,
            longitude: 2.0,
            popup: "</script>".to_string(),
        });
        assert!(!map.script().contains("</script>"));
        assert!(LeafletMap::new().script().is_empty());
    }

    #[test]
    fn test_region_map_rows() {
        let map = render_region_map(crate::electoral::states());
        assert_eq!(map.rows.len(), crate::electoral::states().len());

        let gujarat = map.rows.iter().find(|r| r.code == "IN-GJ").unwrap();
        assert_eq!(gujarat.bucket, 1);
        assert!(map.script("regions_div").contains("regions_div"));
    }
}
