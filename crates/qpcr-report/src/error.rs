//! Error types for report and export generation.

use std::path::PathBuf;

use qpcr_core::CoreError;
use thiserror::Error;

/// Errors that can occur while writing reports or exports.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to create or write an output file.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize a table.
    #[error("CSV output error: {message}")]
    Csv { message: String },

    /// Dataset query failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        ReportError::Csv {
            message: err.to_string(),
        }
    }
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
