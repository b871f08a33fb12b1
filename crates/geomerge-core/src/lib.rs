// crates/geomerge-core/src/lib.rs

//! geomerge-core
//! =============
//!
//! Two independent pipelines around a world-countries map:
//!
//! 1. **Map**: [`load_country_data`] reads a CSV keyed by ISO alpha-3,
//!    [`merge_geojson_with_data`] copies those rows into a GeoJSON
//!    `FeatureCollection`, and [`render::write_map`] writes a Leaflet page.
//! 2. **Facts**: [`facts::generate_capitals_facts`] downloads the REST
//!    Countries dataset once and writes a name-keyed capitals/facts cache.
//!
//! ```no_run
//! use geomerge_core::{load_country_data, merge_geojson_with_data, render};
//!
//! # fn main() -> geomerge_core::Result<()> {
//! let table = load_country_data("countries_data.csv")?;
//! let (merged, stats) = merge_geojson_with_data("countries.geojson", &table)?;
//! println!("matched {} of {} features", stats.matched, stats.features);
//! render::write_map(&merged, &render::MapOptions::default())?;
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod error;
pub mod facts;
pub mod geo;
pub mod loader;
pub mod render;
pub mod text;

// Re-exports
pub use crate::common::MergeStats;
pub use crate::error::{GeoMergeError, Result};
pub use crate::geo::{load_feature_collection, merge_geojson_with_data, Feature, FeatureCollection};
pub use crate::loader::{load_country_data, CountryRecord, CountryTable};
