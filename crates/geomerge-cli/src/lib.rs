//! geomerge-cli
//! ============
//!
//! Command-line interface for the `geomerge-core` country map pipelines.
//!
//! This crate primarily provides a binary (`geomerge`). We include a small
//! library target so that docs.rs renders a documentation page and shows this
//! overview.
//!
//! Basic usage:
//!
//! ```text
//! geomerge --help
//! geomerge map --csv countries_data.csv --geojson countries.geojson -o mapa.html
//! geomerge merge --geojson countries.geojson -o merged.geojson
//! geomerge facts -o capitals_facts.json
//! ```
//!
//! For programmatic access use the [`geomerge-core`] crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]

// This library target intentionally exposes no API; the binary is the primary
// deliverable.
