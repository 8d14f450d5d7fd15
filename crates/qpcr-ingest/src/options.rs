//! Reader options.

/// Options for reading a run export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    /// Field separator.
    pub separator: u8,
    /// Lines starting with this byte are skipped.
    pub comment: Option<u8>,
    /// Drop every column that contains a missing value.
    pub drop_missing_columns: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            separator: b',',
            comment: Some(b'#'),
            drop_missing_columns: true,
        }
    }
}

impl IngestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: Option<u8>) -> Self {
        self.comment = comment;
        self
    }

    #[must_use]
    pub fn with_drop_missing_columns(mut self, drop: bool) -> Self {
        self.drop_missing_columns = drop;
        self
    }
}
