//! geomerge — Command-line interface for geomerge-core
//!
//! Usage examples
//! --------------
//!
//! - Build the map from `countries_data.csv` + `countries.geojson`
//!   $ geomerge map
//!   $ geomerge map --csv data/countries.csv --geojson data/world.geojson -o world.html
//!
//! - Only write the merged GeoJSON
//!   $ geomerge merge --geojson world.geojson -o merged.geojson
//!
//! - Refresh the capitals/facts cache
//!   $ geomerge facts -o capitals_facts.json
//!   $ geomerge facts --timeout-secs 60
//!
//! Logging goes to stderr. `--verbose` switches to debug level; `RUST_LOG`
//! takes precedence when set.
mod args;

use crate::args::{CliArgs, Commands, Inputs};
use anyhow::Context;
use clap::Parser;
use geomerge_core::render::{self, MapOptions};
use geomerge_core::{load_country_data, merge_geojson_with_data, FeatureCollection};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Map {
            inputs,
            output,
            merged_out,
        } => {
            let merged = merge_inputs(&inputs)?;
            if let Some(path) = merged_out {
                merged
                    .save_as(&path)
                    .with_context(|| format!("writing merged GeoJSON to {}", path.display()))?;
            }
            let options = MapOptions {
                output,
                ..MapOptions::default()
            };
            let path = render::write_map(&merged, &options).context("rendering map")?;
            println!("Map saved to {}", path.display());
        }

        Commands::Merge { inputs, output } => {
            let merged = merge_inputs(&inputs)?;
            merged
                .save_as(&output)
                .with_context(|| format!("writing merged GeoJSON to {}", output.display()))?;
            println!("Merged GeoJSON saved to {}", output.display());
        }

        #[cfg(feature = "fetch")]
        Commands::Facts {
            url,
            timeout_secs,
            output,
        } => {
            use geomerge_core::facts::{generate_capitals_facts, FetchConfig};
            use std::time::Duration;

            let mut config = FetchConfig {
                timeout: Duration::from_secs(timeout_secs),
                ..FetchConfig::default()
            };
            if let Some(url) = url {
                config.url = url;
            }
            let cache = generate_capitals_facts(&config, &output)
                .with_context(|| format!("generating facts cache from {}", config.url))?;
            println!("Done. Countries: {} ({})", cache.len(), output.display());
        }
    }

    Ok(())
}

fn merge_inputs(inputs: &Inputs) -> anyhow::Result<FeatureCollection> {
    let table = load_country_data(&inputs.csv)
        .with_context(|| format!("loading country table {}", inputs.csv.display()))?;
    let (merged, stats) = merge_geojson_with_data(&inputs.geojson, &table)
        .with_context(|| format!("merging into {}", inputs.geojson.display()))?;
    println!(
        "Merged {} of {} features ({} rows loaded)",
        stats.matched,
        stats.features,
        table.len()
    );
    Ok(merged)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
