use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for geomerge
#[derive(Debug, Parser)]
#[command(
    name = "geomerge",
    version,
    about = "Join country CSV data with GeoJSON boundaries, render a map, build a facts cache"
)]
pub struct CliArgs {
    /// Log debug details (overridden by RUST_LOG)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Args)]
pub struct Inputs {
    /// Country attributes CSV (needs an iso_a3, ISO_A3 or id column)
    #[arg(long = "csv", default_value = "countries_data.csv")]
    pub csv: PathBuf,

    /// Country boundaries as a GeoJSON FeatureCollection
    #[arg(long = "geojson", default_value = "countries.geojson")]
    pub geojson: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge the CSV into the GeoJSON and write an interactive HTML map
    Map {
        #[command(flatten)]
        inputs: Inputs,

        /// Output HTML file
        #[arg(short = 'o', long = "output", default_value = "mapa.html")]
        output: PathBuf,

        /// Also write the merged GeoJSON here
        #[arg(long = "merged-out")]
        merged_out: Option<PathBuf>,
    },

    /// Merge the CSV into the GeoJSON and write the merged GeoJSON only
    Merge {
        #[command(flatten)]
        inputs: Inputs,

        /// Output GeoJSON file
        #[arg(short = 'o', long = "output")]
        output: PathBuf,
    },

    /// Download country data and write the capitals/facts cache
    #[cfg(feature = "fetch")]
    Facts {
        /// Country dataset endpoint (REST Countries v3.1 format)
        #[arg(long = "url")]
        url: Option<String>,

        /// Request timeout in seconds
        #[arg(long = "timeout-secs", default_value_t = 30)]
        timeout_secs: u64,

        /// Output JSON file
        #[arg(short = 'o', long = "output", default_value = geomerge_core::facts::DEFAULT_CACHE_FILENAME)]
        output: PathBuf,
    },
}
