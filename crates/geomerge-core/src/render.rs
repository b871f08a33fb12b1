// crates/geomerge-core/src/render.rs

//! # Map Renderer
//!
//! Writes the merged collection as a single Leaflet page. Popup and tooltip
//! markup is computed here and stored on each feature under reserved
//! property names, so the page script only binds what it is given.

use crate::common::first_present;
use crate::error::{GeoMergeError, Result};
use crate::geo::{FeatureCollection, Properties};
use crate::loader::common_io;
use crate::text::escape_html;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

pub const POPUP_PROPERTY: &str = "_popup_html";
pub const TOOLTIP_PROPERTY: &str = "_tooltip";

/// Display-name properties, in priority order.
pub const NAME_KEYS: [&str; 3] = ["name", "NAME", "ADMIN"];
pub const UNNAMED: &str = "Sin Nombre";
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone)]
pub struct MapOptions {
    /// Initial view center as `(lat, lng)`.
    pub center: (f64, f64),
    pub zoom: u8,
    pub output: PathBuf,
    /// Overlay name in the layer control.
    pub layer_name: String,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: (20.0, 0.0),
            zoom: 2,
            output: PathBuf::from("mapa.html"),
            layer_name: "Paises".to_string(),
        }
    }
}

/// Renders the collection to a self-contained HTML document.
pub fn render_map(collection: &FeatureCollection, options: &MapOptions) -> Result<String> {
    let mut annotated = collection.clone();
    for feature in &mut annotated.features {
        let popup = popup_html(&feature.properties);
        let tooltip = escape_html(&display_name(&feature.properties));
        feature
            .properties
            .insert(POPUP_PROPERTY.to_string(), Value::String(popup));
        feature
            .properties
            .insert(TOOLTIP_PROPERTY.to_string(), Value::String(tooltip));
    }

    let data = to_json(&annotated, &options.output)?;
    let layer_name = to_json(&options.layer_name, &options.output)?;

    Ok(PAGE_TEMPLATE
        .replace("__LAT__", &options.center.0.to_string())
        .replace("__LNG__", &options.center.1.to_string())
        .replace("__ZOOM__", &options.zoom.to_string())
        .replace("__LAYER_NAME__", &script_safe(&layer_name))
        .replace("__DATA__", &script_safe(&data)))
}

/// Renders and writes the page to `options.output`.
pub fn write_map(collection: &FeatureCollection, options: &MapOptions) -> Result<PathBuf> {
    let html = render_map(collection, options)?;
    common_io::write_atomic(&options.output, html.as_bytes())?;
    info!(path = %options.output.display(), features = collection.len(), "map saved");
    Ok(options.output.clone())
}

/// First non-empty display name, or the placeholder.
pub fn display_name(props: &Properties) -> String {
    first_present(NAME_KEYS.iter().map(|k| props.get(*k).and_then(value_text)))
        .unwrap_or_else(|| UNNAMED.to_string())
}

/// Popup card for one feature. Every interpolated value is escaped.
pub fn popup_html(props: &Properties) -> String {
    let name = escape_html(&display_name(props));
    let capital = escape_html(&text_or(props, "capital", NOT_AVAILABLE));
    let population = escape_html(&text_or(props, "population", NOT_AVAILABLE));
    let fun_fact = escape_html(&text_or(props, "fun_fact", ""));
    let flag = text_or(props, "flag_url", "");
    let flag_img = if flag.is_empty() {
        String::new()
    } else {
        format!(
            "<img src=\"{}\" width=\"160\" style=\"display:block;margin-bottom:8px;\"/>",
            escape_html(&flag)
        )
    };

    format!(
        "<div style=\"font-family: Arial; font-size: 14px; width: 260px;\">\
         <h4 style=\"margin:0 0 6px 0;\">{name}</h4>\
         {flag_img}\
         <b>Capital:</b> {capital}<br/>\
         <b>Población:</b> {population}<br/>\
         <p style=\"margin-top:6px;\">{fun_fact}</p>\
         </div>"
    )
}

/// Property as text; a missing or `null` property yields `default`.
fn text_or(props: &Properties, key: &str, default: &str) -> String {
    props
        .get(key)
        .and_then(value_text)
        .unwrap_or_else(|| default.to_string())
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn to_json<T: Serialize>(value: &T, output: &Path) -> Result<String> {
    serde_json::to_string(value).map_err(|e| GeoMergeError::OutputWriteFailed {
        path: output.to_path_buf(),
        source: e.into(),
    })
}

/// Keeps embedded JSON from closing the surrounding `<script>` element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1.0"/>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"/>
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map { height: 100%; margin: 0; }</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map("map").setView([__LAT__, __LNG__], __ZOOM__);
L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
    maxZoom: 19,
    attribution: "&copy; OpenStreetMap contributors"
}).addTo(map);

var baseStyle = { fillColor: "#ffffff", color: "#333333", weight: 1, fillOpacity: 0.5 };
var highlightStyle = { fillColor: "#0000ff", color: "#0000ff", weight: 2, fillOpacity: 0.7 };

var countries = L.geoJSON(__DATA__, {
    style: function () { return baseStyle; },
    onEachFeature: function (feature, layer) {
        var p = feature.properties || {};
        layer.bindPopup(p._popup_html, { maxWidth: 300 });
        layer.bindTooltip(p._tooltip, { sticky: true });
        layer.on({
            mouseover: function (e) { e.target.setStyle(highlightStyle); },
            mouseout: function (e) { countries.resetStyle(e.target); }
        });
    }
}).addTo(map);

var overlays = {};
overlays[__LAYER_NAME__] = countries;
L.control.layers(null, overlays).addTo(map);
</script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Properties {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn display_name_priority_and_default() {
        assert_eq!(display_name(&props(json!({ "NAME": "France", "ADMIN": "French Republic" }))), "France");
        assert_eq!(display_name(&props(json!({ "name": "", "ADMIN": "Spain" }))), "Spain");
        assert_eq!(display_name(&props(json!({}))), UNNAMED);
    }

    #[test]
    fn popup_defaults() {
        let html = popup_html(&props(json!({})));
        assert!(html.contains("<h4 style=\"margin:0 0 6px 0;\">Sin Nombre</h4>"));
        assert!(html.contains("<b>Capital:</b> N/A<br/>"));
        assert!(html.contains("<b>Población:</b> N/A<br/>"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn popup_uses_properties_and_flag() {
        let html = popup_html(&props(json!({
            "name": "Peru",
            "capital": "Lima",
            "population": 34000000,
            "fun_fact": "Home of Machu Picchu",
            "flag_url": "https://flags.example/pe.png"
        })));
        assert!(html.contains(">Peru</h4>"));
        assert!(html.contains("<b>Capital:</b> Lima"));
        assert!(html.contains("<b>Población:</b> 34000000"));
        assert!(html.contains("Home of Machu Picchu"));
        assert!(html.contains("<img src=\"https://flags.example/pe.png\""));
    }

    #[test]
    fn popup_escapes_markup() {
        let html = popup_html(&props(json!({ "name": "<script>x</script>", "fun_fact": "A & B" })));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(html.contains("A &amp; B"));
    }

    #[test]
    fn page_embeds_annotated_collection() {
        let fc: FeatureCollection = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "ADMIN": "Chile", "fun_fact": "</script><b>" },
                "geometry": null
            }]
        }))
        .unwrap();

        let html = render_map(&fc, &MapOptions::default()).unwrap();

        assert!(html.contains("setView([20, 0], 2)"));
        assert!(html.contains("overlays[\"Paises\"]"));
        assert!(html.contains("\"_tooltip\":\"Chile\""));
        // only the page's own two script tags close
        assert_eq!(html.matches("</script>").count(), 2);
        // the input collection itself is not modified
        assert!(!fc.features[0].properties.contains_key(POPUP_PROPERTY));
    }

    #[test]
    fn page_carries_base_and_highlight_styles() {
        let fc = FeatureCollection::from_slice(br#"{"type":"FeatureCollection","features":[]}"#)
            .unwrap();

        let html = render_map(&fc, &MapOptions::default()).unwrap();

        assert!(html.contains(r##"fillColor: "#ffffff", color: "#333333", weight: 1, fillOpacity: 0.5"##));
        assert!(html.contains(r##"fillColor: "#0000ff", color: "#0000ff", weight: 2, fillOpacity: 0.7"##));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn write_map_creates_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let options = MapOptions {
            output: dir.path().join("mapa.html"),
            ..MapOptions::default()
        };
        let fc = FeatureCollection::from_slice(br#"{"type":"FeatureCollection","features":[]}"#)
            .unwrap();

        let path = write_map(&fc, &options).unwrap();

        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}
