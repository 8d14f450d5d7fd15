//! Error types for dataset assembly and analysis.

use std::path::PathBuf;

use qpcr_model::ModelError;
use thiserror::Error;

/// Errors that can occur while assembling or analysing a plate dataset.
#[derive(Debug, Error)]
pub enum CoreError {
    // === Dataset Assembly Errors ===
    /// Channel key was already added to the dataset.
    #[error("channel '{channel}' is already in the dataset")]
    DuplicateChannel { channel: String },

    /// Appended channel table does not share the dataset's row index.
    #[error(
        "channel row mismatch: expected {expected_rows} rows indexed by '{expected_index}', \
         found {found_rows} rows indexed by '{found_index}'"
    )]
    RowMismatch {
        expected_rows: usize,
        found_rows: usize,
        expected_index: String,
        found_index: String,
    },

    /// Frame columns disagree on length.
    #[error("column '{column}' has {found} rows, index has {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },

    // === Query Errors ===
    /// Zero-based channel index is not below the channel count.
    #[error("channel index {index} out of range for {count} channels")]
    ChannelOutOfRange { index: usize, count: usize },

    /// Operation requires a loaded dataset.
    #[error("no dataset loaded")]
    NoDataset,

    /// Coordinate conversion failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    // === Settings Errors ===
    /// Failed to read or write a settings file.
    #[error("settings file {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not a JSON object.
    #[error("invalid settings file {path}: {message}")]
    SettingsParse { path: PathBuf, message: String },
}

impl From<polars::prelude::PolarsError> for CoreError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::DuplicateChannel {
            channel: "Step1Channel1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "channel 'Step1Channel1' is already in the dataset"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("A1_0".into());
        let core_err: CoreError = polars_err.into();
        assert!(matches!(core_err, CoreError::DataFrame { .. }));
    }

    #[test]
    fn test_error_from_model() {
        let err: CoreError = ModelError::UnknownWell {
            well: "Q1".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "unknown well label 'Q1'");
    }
}
