//! Error types produced by the ingest crate.
//!
//! A missing source file is not an error: the loader treats it as an empty
//! table and logs a warning. Errors are reserved for sources that exist but
//! cannot be read or parsed.
//!
//! | Error | Cause |
//! |-------|-------|
//! | [`Io`](IngestError::Io) | The file exists but could not be opened or read |
//! | [`Csv`](IngestError::Csv) | The file is not valid CSV (bad quoting, invalid UTF-8) |

use std::io;

use thiserror::Error;

/// Errors surfaced while loading record tables.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Low-level IO failure on an existing source.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    /// The source could not be parsed as CSV.
    #[error("malformed csv in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

impl IngestError {
    /// Path of the source that failed to load.
    pub fn path(&self) -> &str {
        match self {
            IngestError::Io { path, .. } | IngestError::Csv { path, .. } => path,
        }
    }
}
