// crates/geomerge-core/src/loader/mod.rs

//! # Tabular Loader
//!
//! Reads a CSV of country attributes into a [`CountryTable`] keyed by the
//! normalized ISO alpha-3 identifier.

use crate::common::{first_present, normalize_identifier};
use crate::error::Result;
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

pub mod common_io;

/// Columns that may carry the row identifier, in priority order.
pub const TABLE_ID_COLUMNS: [&str; 3] = ["iso_a3", "ISO_A3", "id"];

/// One CSV row: header name -> cell text.
pub type CountryRecord = BTreeMap<String, String>;

/// Country rows keyed by normalized identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryTable {
    records: HashMap<String, CountryRecord>,
}

impl CountryTable {
    /// Parses CSV with a header row from any reader.
    ///
    /// Rows whose identifier columns are all missing or blank are skipped.
    /// When two rows normalize to the same identifier the later one wins.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv.headers()?.clone();
        let mut records = HashMap::new();

        for (line, row) in csv.records().enumerate() {
            let row = row?;
            let record: CountryRecord = headers
                .iter()
                .zip(row.iter())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();

            let key = first_present(TABLE_ID_COLUMNS.iter().map(|col| record.get(*col)));
            match key {
                Some(key) => {
                    let key = normalize_identifier(key);
                    records.insert(key, record);
                }
                None => debug!(row = line + 1, "skipping row without identifier"),
            }
        }

        Ok(Self { records })
    }

    pub fn get(&self, id: &str) -> Option<&CountryRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Loads the country CSV at `path`.
pub fn load_country_data(path: impl AsRef<Path>) -> Result<CountryTable> {
    let path = path.as_ref();
    let reader = common_io::open_stream(path)?;
    let table = CountryTable::from_reader(reader)?;
    info!(path = %path.display(), countries = table.len(), "loaded country table");
    Ok(table)
}
