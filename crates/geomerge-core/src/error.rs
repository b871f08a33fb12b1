// crates/geomerge-core/src/error.rs
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that terminate a pipeline run.
///
/// None of these trigger a retry. Rows and features without a usable
/// identifier are not errors and never surface here.
#[derive(Debug, Error)]
pub enum GeoMergeError {
    /// An input file is missing or cannot be read.
    #[error("cannot read {}: {source}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An input decoded but does not have the expected shape.
    #[error("malformed source: {0}")]
    SourceMalformed(String),

    /// The remote country dataset could not be fetched or decoded.
    #[error("remote fetch failed: {0}")]
    RemoteFetchFailed(String),

    /// An output artifact could not be written.
    #[error("cannot write {}: {source}", .path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<csv::Error> for GeoMergeError {
    fn from(e: csv::Error) -> Self {
        GeoMergeError::SourceMalformed(format!("CSV: {e}"))
    }
}

impl From<serde_json::Error> for GeoMergeError {
    fn from(e: serde_json::Error) -> Self {
        GeoMergeError::SourceMalformed(format!("JSON: {e}"))
    }
}

pub type Result<T> = std::result::Result<T, GeoMergeError>;
