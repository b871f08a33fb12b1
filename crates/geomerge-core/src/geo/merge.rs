// crates/geomerge-core/src/geo/merge.rs
use super::{load_feature_collection, Feature, FeatureCollection};
use crate::common::MergeStats;
use crate::error::Result;
use crate::loader::{CountryRecord, CountryTable};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

impl FeatureCollection {
    /// Copies every matching country record into its feature's properties.
    ///
    /// Record fields overwrite same-named properties; everything else on the
    /// feature is left alone. Features without an identifier or without a
    /// matching record pass through unchanged. Running this twice with the
    /// same table gives the same collection.
    pub fn merge(&mut self, table: &CountryTable) -> MergeStats {
        let mut stats = MergeStats {
            features: self.features.len(),
            ..MergeStats::default()
        };

        for feature in &mut self.features {
            let Some(id) = feature.identifier() else {
                stats.without_identifier += 1;
                continue;
            };
            match table.get(&id) {
                Some(record) => {
                    feature.absorb(record);
                    stats.matched += 1;
                }
                None => debug!(%id, "no country row for feature"),
            }
        }

        stats
    }
}

impl Feature {
    fn absorb(&mut self, record: &CountryRecord) {
        for (key, value) in record {
            self.properties
                .insert(key.clone(), Value::String(value.clone()));
        }
    }
}

/// Loads the GeoJSON at `path` and merges `table` into it.
pub fn merge_geojson_with_data(
    path: impl AsRef<Path>,
    table: &CountryTable,
) -> Result<(FeatureCollection, MergeStats)> {
    let mut collection = load_feature_collection(path)?;
    let stats = collection.merge(table);
    info!(
        features = stats.features,
        matched = stats.matched,
        unmatched = stats.unmatched(),
        without_identifier = stats.without_identifier,
        "merged country data into features"
    );
    Ok((collection, stats))
}
