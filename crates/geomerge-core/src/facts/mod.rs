// crates/geomerge-core/src/facts/mod.rs

//! # Facts Fetcher
//!
//! Turns the REST Countries dataset into a small cache:
//! normalized country name -> capital, coordinates and a one-line fact.
//!
//! The cache is keyed by [`normalize_name`], a different key space from the
//! ISO identifiers used by the loader and merger.

use crate::common::first_present;
use crate::error::{GeoMergeError, Result};
use crate::loader::common_io;
use crate::text::{group_thousands, normalize_name};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

#[cfg(feature = "fetch")]
mod fetch;
pub mod raw;

#[cfg(feature = "fetch")]
pub use fetch::{generate_capitals_facts, FactsFetcher, FetchConfig, DEFAULT_FACTS_URL};
pub use raw::{CapitalInfo, CountriesRaw, RemoteCountry, RemoteName};

/// A fact never has more than this many clauses.
pub const MAX_FACT_CLAUSES: usize = 3;

/// Default output file for the cache.
pub const DEFAULT_CACHE_FILENAME: &str = "capitals_facts.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactEntry {
    pub capital_name: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub fact: String,
}

/// Normalized name -> entry, serialized in key order.
pub type FactCache = BTreeMap<String, FactEntry>;

/// Decodes a full response body. Anything but a JSON array of country
/// objects is a fetch failure.
pub fn decode_countries(body: &[u8]) -> Result<CountriesRaw> {
    serde_json::from_slice(body)
        .map_err(|e| GeoMergeError::RemoteFetchFailed(format!("undecodable response: {e}")))
}

/// Cache key: first non-empty of common name, official name, cca3, cca2.
pub fn primary_name(item: &RemoteCountry) -> String {
    let name = item.name.as_ref();
    first_present([
        name.and_then(|n| n.common.as_deref()),
        name.and_then(|n| n.official.as_deref()),
        item.cca3.as_deref(),
        item.cca2.as_deref(),
    ])
    .map(normalize_name)
    .unwrap_or_default()
}

/// Capital coordinates if known, else the country's own centroid.
fn coordinates(item: &RemoteCountry) -> Option<(f64, f64)> {
    first_present([
        as_pair(item.capital_info.as_ref().and_then(|c| c.latlng.as_ref())),
        as_pair(item.latlng.as_ref()),
    ])
    .map(|p| (p[0], p[1]))
}

fn as_pair(latlng: Option<&Vec<f64>>) -> Option<&[f64]> {
    latlng.map(Vec::as_slice).filter(|p| p.len() >= 2)
}

/// Builds the short summary sentence for one country.
///
/// Clauses in fixed order: region, population, area, currency, languages;
/// only the first [`MAX_FACT_CLAUSES`] present ones are kept.
///
/// Currency and language maps are unordered upstream; the lowest code wins
/// so the output does not depend on response ordering.
pub fn make_fact(item: &RemoteCountry) -> String {
    let clauses = [
        item.region
            .as_deref()
            .filter(|r| !r.is_empty())
            .map(|r| format!("Region: {r}")),
        item.population
            .filter(|p| *p != 0)
            .map(|p| format!("Population: {}", group_thousands(p as i64))),
        item.area
            .filter(|a| *a != 0.0)
            .map(|a| format!("Area: {} km²", group_thousands(a.trunc() as i64))),
        item.currencies.as_ref().and_then(currency_clause),
        item.languages.as_ref().and_then(languages_clause),
    ];

    clauses
        .into_iter()
        .flatten()
        .take(MAX_FACT_CLAUSES)
        .collect::<Vec<_>>()
        .join(". ")
}

fn sorted_values(map: &Map<String, Value>) -> Vec<&Value> {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries.into_iter().map(|(_, v)| v).collect()
}

fn currency_clause(currencies: &Map<String, Value>) -> Option<String> {
    let first = sorted_values(currencies).into_iter().next()?;
    let name = first.get("name")?.as_str()?;
    if name.is_empty() {
        return None;
    }
    Some(format!("Currency: {name}"))
}

fn languages_clause(languages: &Map<String, Value>) -> Option<String> {
    let names = sorted_values(languages)
        .into_iter()
        .take(2)
        .map(Value::as_str)
        .collect::<Option<Vec<&str>>>()?;
    if names.is_empty() {
        return None;
    }
    Some(format!("Languages: {}", names.join(", ")))
}

/// Derives the cache key and entry for one country.
pub fn fact_entry(item: &RemoteCountry) -> (String, FactEntry) {
    let capital_name = item
        .capital
        .as_ref()
        .and_then(|c| c.first())
        .cloned()
        .unwrap_or_default();
    let (lat, lng) = match coordinates(item) {
        Some((lat, lng)) => (Some(lat), Some(lng)),
        None => (None, None),
    };
    let entry = FactEntry {
        capital_name,
        lat,
        lng,
        fact: make_fact(item),
    };
    (primary_name(item), entry)
}

/// Builds the whole cache. Later items overwrite earlier ones that share a
/// key; items without any name collapse into the `""` key.
pub fn build_fact_cache(items: &[RemoteCountry]) -> FactCache {
    let mut cache = FactCache::new();
    for item in items {
        let (key, entry) = fact_entry(item);
        if key.is_empty() {
            debug!("country without any name, stored under empty key");
        }
        if cache.insert(key.clone(), entry).is_some() {
            debug!(%key, "duplicate country name, keeping the later entry");
        }
    }
    cache
}

/// Writes the cache as pretty JSON (2-space indent, UTF-8, no ASCII
/// escaping), replacing whatever was at `path`.
pub fn write_fact_cache(path: impl AsRef<Path>, cache: &FactCache) -> Result<()> {
    let path = path.as_ref();
    let bytes =
        serde_json::to_vec_pretty(cache).map_err(|e| GeoMergeError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
    common_io::write_atomic(path, &bytes)?;
    info!(path = %path.display(), countries = cache.len(), "wrote facts cache");
    Ok(())
}

/// Reads a cache previously produced by [`write_fact_cache`].
pub fn load_fact_cache(path: impl AsRef<Path>) -> Result<FactCache> {
    let reader = common_io::open_stream(path.as_ref())?;
    Ok(serde_json::from_reader(reader)?)
}
