// crates/geomerge-core/src/geo/mod.rs

//! # GeoJSON Model
//!
//! A thin typed view over a GeoJSON `FeatureCollection`. Geometry and any
//! unknown members are carried through untouched; only the property bag is
//! inspected and modified.

use crate::common::normalize_identifier;
use crate::error::{GeoMergeError, Result};
use crate::loader::common_io;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::io::Read;
use std::path::Path;
use tracing::info;

mod merge;

pub use merge::merge_geojson_with_data;

/// Property names that may carry a feature's identifier, in priority order.
pub const FEATURE_ID_KEYS: [&str; 5] = ["ISO_A3", "iso_a3", "ADM0_A3", "id", "ISO3166-1:alpha3"];

pub type Properties = Map<String, Value>;

/// Members absent from the source stay absent on output; `type` and
/// `geometry` are only written back when they were read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub features: Vec<Feature>,
    /// Foreign members (`bbox`, `crs`, `name`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Properties,
    /// `Some(Value::Null)` for an explicit `"geometry": null`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub geometry: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// `"properties": null` is legal GeoJSON; treat it as an empty bag.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Properties, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Properties>::deserialize(deserializer)?.unwrap_or_default())
}

impl FeatureCollection {
    /// Decodes a collection, failing on anything that is not a
    /// `FeatureCollection` object with a `features` list.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let collection: FeatureCollection = serde_json::from_reader(reader)?;
        collection.validate()?;
        Ok(collection)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let collection: FeatureCollection = serde_json::from_slice(bytes)?;
        collection.validate()?;
        Ok(collection)
    }

    /// A missing `type` is tolerated; any other value is rejected.
    fn validate(&self) -> Result<()> {
        match self.kind.as_deref() {
            None | Some("FeatureCollection") => Ok(()),
            Some(other) => Err(GeoMergeError::SourceMalformed(format!(
                "expected a FeatureCollection, found type {other:?}"
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Writes the collection as compact JSON, replacing `path`.
    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = serde_json::to_vec(self).map_err(|e| GeoMergeError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        common_io::write_atomic(path, &bytes)?;
        info!(path = %path.display(), features = self.len(), "wrote merged GeoJSON");
        Ok(())
    }
}

impl Feature {
    /// The feature's normalized identifier, or `None` when no candidate
    /// property holds a usable value.
    ///
    /// Numeric identifiers (`"id": 250`) are read as their decimal text.
    pub fn identifier(&self) -> Option<String> {
        crate::common::first_present(
            FEATURE_ID_KEYS
                .iter()
                .map(|key| self.properties.get(*key).and_then(scalar_text)),
        )
        .map(|raw| normalize_identifier(&raw))
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads the GeoJSON file at `path`.
pub fn load_feature_collection(path: impl AsRef<Path>) -> Result<FeatureCollection> {
    let path = path.as_ref();
    let reader = common_io::open_stream(path)?;
    let collection = FeatureCollection::from_reader(reader)?;
    info!(path = %path.display(), features = collection.len(), "loaded feature collection");
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(props: Value) -> Feature {
        serde_json::from_value(json!({
            "type": "Feature",
            "properties": props,
            "geometry": null
        }))
        .unwrap()
    }

    #[test]
    fn identifier_priority_order() {
        let f = feature(json!({ "iso_a3": "aaa", "ISO_A3": "bbb", "ADM0_A3": "CCC" }));
        assert_eq!(f.identifier().as_deref(), Some("BBB"));

        let f = feature(json!({ "ADM0_A3": " fra ", "id": "XXX" }));
        assert_eq!(f.identifier().as_deref(), Some("FRA"));

        let f = feature(json!({ "ISO3166-1:alpha3": "nor" }));
        assert_eq!(f.identifier().as_deref(), Some("NOR"));
    }

    #[test]
    fn blank_and_non_scalar_candidates_are_skipped() {
        let f = feature(json!({ "ISO_A3": "", "iso_a3": null, "ADM0_A3": ["X"], "id": "swe" }));
        assert_eq!(f.identifier().as_deref(), Some("SWE"));
    }

    #[test]
    fn numeric_id_is_text() {
        let f = feature(json!({ "id": 250 }));
        assert_eq!(f.identifier().as_deref(), Some("250"));
    }

    #[test]
    fn no_identifier() {
        let f = feature(json!({ "name": "Somewhere" }));
        assert_eq!(f.identifier(), None);
    }

    #[test]
    fn null_or_missing_properties_become_empty() {
        let fc = FeatureCollection::from_slice(
            br#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":null,"geometry":null},
                {"type":"Feature","geometry":null}
            ]}"#,
        )
        .unwrap();
        assert!(fc.features.iter().all(|f| f.properties.is_empty()));
    }

    #[test]
    fn foreign_members_round_trip() {
        let src = json!({
            "type": "FeatureCollection",
            "name": "countries",
            "features": [{
                "type": "Feature",
                "id": 7,
                "properties": { "ISO_A3": "FRA" },
                "geometry": { "type": "Point", "coordinates": [2.35, 48.85] }
            }]
        });
        let fc: FeatureCollection = serde_json::from_value(src.clone()).unwrap();
        assert_eq!(serde_json::to_value(&fc).unwrap(), src);
    }

    #[test]
    fn missing_features_is_malformed() {
        let err = FeatureCollection::from_slice(br#"{"type":"FeatureCollection"}"#).unwrap_err();
        assert!(matches!(err, GeoMergeError::SourceMalformed(_)));
    }

    #[test]
    fn non_object_is_malformed() {
        let err = FeatureCollection::from_slice(b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, GeoMergeError::SourceMalformed(_)));
    }

    #[test]
    fn wrong_type_is_malformed() {
        let err = FeatureCollection::from_slice(br#"{"type":"Feature","features":[]}"#).unwrap_err();
        assert!(matches!(err, GeoMergeError::SourceMalformed(_)));
    }

    #[test]
    fn empty_collection_is_valid() {
        let fc = FeatureCollection::from_slice(br#"{"type":"FeatureCollection","features":[]}"#)
            .unwrap();
        assert!(fc.is_empty());
    }

    #[test]
    fn absent_type_and_geometry_stay_absent() {
        let src = json!({
            "features": [
                { "properties": { "ISO_A3": "FRA" } },
                { "type": "Feature", "properties": {}, "geometry": null }
            ]
        });
        let fc: FeatureCollection = serde_json::from_value(src.clone()).unwrap();
        fc.validate().unwrap();
        assert_eq!(fc.features[0].geometry, None);
        assert_eq!(fc.features[1].geometry, Some(Value::Null));
        assert_eq!(serde_json::to_value(&fc).unwrap(), src);
    }
}
