//! Error types for plate coordinate conversions.

use thiserror::Error;

/// Errors raised when a label or coordinate falls outside the 96-well universe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Well label is not one of `A1`..`H12`.
    #[error("unknown well label '{well}'")]
    UnknownWell { well: String },

    /// Cell coordinate is outside the 8x12 grid.
    #[error("cell ({row}, {col}) is outside the 96-well grid")]
    UnknownCell { row: usize, col: usize },

    /// Column key does not have the `<well>_<channel>` shape.
    #[error("malformed column key '{key}'")]
    MalformedColumnKey { key: String },

    /// Channel label does not have the `Channel_<n>` shape.
    #[error("malformed channel label '{label}'")]
    MalformedChannelLabel { label: String },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::UnknownWell {
            well: "Z9".to_string(),
        };
        assert_eq!(err.to_string(), "unknown well label 'Z9'");

        let err = ModelError::UnknownCell { row: 8, col: 0 };
        assert_eq!(err.to_string(), "cell (8, 0) is outside the 96-well grid");
    }
}
