//! Channel blocks of a run export.
//!
//! A block starts at a line whose first field begins with `Step`
//! (`Step1Channel2 HEX`). Its first row holds column labels, with the index
//! name in the first position; the remaining rows hold the index value
//! followed by one value per well.

use std::path::Path;

use qpcr_core::CycleFrame;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};
use crate::options::IngestOptions;

/// Prefix of the first field of a block start line.
pub const BLOCK_START_PREFIX: &str = "Step";

/// Rows collected for one channel before conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelBlock {
    /// Channel key, the first whitespace token of the start line.
    pub key: String,
    /// Display name, the last whitespace token of the start line.
    pub name: String,
    /// Header row followed by data rows.
    pub rows: Vec<Vec<String>>,
}

impl ChannelBlock {
    /// Start a block from the first field of a start line.
    pub fn from_start_field(field: &str) -> Option<Self> {
        if !field.starts_with(BLOCK_START_PREFIX) {
            return None;
        }
        let mut tokens = field.split_whitespace();
        let key = tokens.next()?.to_string();
        let name = tokens.last().map_or_else(|| key.clone(), str::to_string);
        Some(Self {
            key,
            name,
            rows: Vec::new(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Convert to a cycle-indexed frame.
    ///
    /// Unparseable values become missing. Columns with any missing value are
    /// dropped when `options.drop_missing_columns` is set.
    pub fn to_frame(&self, path: &Path, options: &IngestOptions) -> Result<CycleFrame> {
        let Some((header, data)) = self.rows.split_first() else {
            return CycleFrame::from_values("", Vec::new(), Vec::new()).map_err(|source| {
                IngestError::Dataset {
                    path: path.to_path_buf(),
                    source,
                }
            });
        };
        let index_name = header.first().map(String::as_str).unwrap_or_default();

        let mut index = Vec::with_capacity(data.len());
        for (row, fields) in data.iter().enumerate() {
            let value = fields
                .first()
                .and_then(|field| parse_value(field))
                .ok_or_else(|| IngestError::InvalidIndex {
                    path: path.to_path_buf(),
                    channel: self.key.clone(),
                    row: row + 1,
                })?;
            index.push(value);
        }

        let mut columns = Vec::with_capacity(header.len().saturating_sub(1));
        let mut dropped = 0usize;
        for (pos, label) in header.iter().enumerate().skip(1) {
            if label.is_empty() {
                debug!(channel = %self.key, position = pos, "skipping unlabelled column");
                continue;
            }
            let values: Vec<Option<f64>> = data
                .iter()
                .map(|fields| fields.get(pos).and_then(|field| parse_value(field)))
                .collect();
            if options.drop_missing_columns && values.iter().any(Option::is_none) {
                dropped += 1;
                continue;
            }
            columns.push((label.clone(), values));
        }
        if dropped > 0 {
            warn!(
                channel = %self.key,
                dropped,
                "dropped columns with missing values"
            );
        }

        CycleFrame::from_values(index_name, index, columns).map_err(|source| {
            IngestError::Dataset {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

/// Parse a numeric cell; empty, non-numeric and NaN text are missing.
pub fn parse_value(field: &str) -> Option<f64> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| !value.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&str]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|line| line.split(',').map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn start_line_splits_key_and_name() {
        let block = ChannelBlock::from_start_field("Step1Channel2 HEX").unwrap();
        assert_eq!(block.key, "Step1Channel2");
        assert_eq!(block.name, "HEX");

        let bare = ChannelBlock::from_start_field("Step1Channel1").unwrap();
        assert_eq!(bare.name, "Step1Channel1");

        assert!(ChannelBlock::from_start_field("Cycle").is_none());
    }

    #[test]
    fn coerces_and_drops_missing_columns() {
        let mut block = ChannelBlock::from_start_field("Step1Channel1 FAM").unwrap();
        block.rows = rows(&["Cycle,A1,A2,A3", "1,10,x,5", "2,11,12,"]);
        let frame = block
            .to_frame(Path::new("run.csv"), &IngestOptions::default())
            .unwrap();
        assert_eq!(frame.index_name(), "Cycle");
        assert_eq!(frame.column_names(), vec!["A1"]);
        assert_eq!(frame.index_values().unwrap(), vec![1.0, 2.0]);

        let kept = block
            .to_frame(
                Path::new("run.csv"),
                &IngestOptions::default().with_drop_missing_columns(false),
            )
            .unwrap();
        assert_eq!(kept.column_names(), vec!["A1", "A2", "A3"]);
        assert_eq!(
            kept.column_values("A2").unwrap(),
            vec![None, Some(12.0)]
        );
    }

    #[test]
    fn rejects_non_numeric_index() {
        let mut block = ChannelBlock::from_start_field("Step1Channel1 FAM").unwrap();
        block.rows = rows(&["Cycle,A1", "1,10", "two,11"]);
        let err = block
            .to_frame(Path::new("run.csv"), &IngestOptions::default())
            .unwrap_err();
        assert!(matches!(err, IngestError::InvalidIndex { row: 2, .. }));
    }

    #[test]
    fn parses_values() {
        assert_eq!(parse_value(" 2.5 "), Some(2.5));
        assert_eq!(parse_value("NaN"), None);
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("abc"), None);
    }
}
