//! Error types for plate run ingestion.

use std::path::PathBuf;

use qpcr_core::CoreError;
use thiserror::Error;

/// Errors that can occur while reading a plate run export.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file does not exist.
    #[error("plate file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read the file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// Malformed delimited text.
    #[error("failed to parse {path}: {message}")]
    Csv { path: PathBuf, message: String },

    /// A data row's first field is not a number.
    #[error("non-numeric index in {path}, channel {channel}, data row {row}")]
    InvalidIndex {
        path: PathBuf,
        channel: String,
        row: usize,
    },

    // === Dataset Errors ===
    /// Channel tables could not be merged (duplicate key, row mismatch, ...).
    #[error("failed to assemble dataset from {path}: {source}")]
    Dataset {
        path: PathBuf,
        #[source]
        source: CoreError,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
