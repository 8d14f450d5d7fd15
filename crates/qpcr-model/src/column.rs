//! Dataset column keys.
//!
//! Every value column of a plate dataset is named `<well>_<channel>` where
//! `channel` is the zero-based position of the channel in load order, e.g.
//! `B3_1` is well B3 in the second channel. Keys are split on the last `_`.

use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, Result};
use crate::plate::{Cell, well_to_cell};

/// Separator between the well label and channel index.
pub const CHANNEL_SEPARATOR: char = '_';

/// Decoded column key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnKey {
    pub well: String,
    pub channel: usize,
}

impl ColumnKey {
    pub fn new(well: impl Into<String>, channel: usize) -> Self {
        Self {
            well: well.into(),
            channel,
        }
    }

    /// Grid cell of the key's well.
    pub fn cell(&self) -> Result<Cell> {
        well_to_cell(&self.well)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.well, channel_index_suffix(self.channel))
    }
}

impl FromStr for ColumnKey {
    type Err = ModelError;

    fn from_str(key: &str) -> Result<Self> {
        let (well, channel) = split_column_key(key)?;
        Ok(Self::new(well, channel))
    }
}

/// Column suffix for a zero-based channel index; channel 0 gives `_0`.
pub fn channel_index_suffix(idx: usize) -> String {
    format!("{CHANNEL_SEPARATOR}{idx}")
}

/// Column suffix for a one-based channel index; channel 1 gives `_0`.
///
/// Returns `None` for `0` and negative values, which select "All" and "None".
pub fn channel_1index_suffix(idx1: i64) -> Option<String> {
    usize::try_from(idx1)
        .ok()
        .filter(|idx| *idx > 0)
        .map(|idx| channel_index_suffix(idx - 1))
}

pub fn column_key(well: &str, channel: usize) -> String {
    format!("{well}{}", channel_index_suffix(channel))
}

fn split_column_key(key: &str) -> Result<(&str, usize)> {
    let malformed = || ModelError::MalformedColumnKey {
        key: key.to_string(),
    };
    let (well, channel) = key.rsplit_once(CHANNEL_SEPARATOR).ok_or_else(malformed)?;
    if well.is_empty() {
        return Err(malformed());
    }
    let channel = channel.parse::<usize>().map_err(|_| malformed())?;
    Ok((well, channel))
}

/// Well part of a column key; `"B4_1"` gives `"B4"`.
pub fn column_to_well(key: &str) -> Result<&str> {
    split_column_key(key).map(|(well, _)| well)
}

/// Zero-based channel index of a column key; `"B4_1"` gives `1`.
pub fn column_to_channel_index(key: &str) -> Result<usize> {
    split_column_key(key).map(|(_, channel)| channel)
}

pub fn column_to_cell(key: &str) -> Result<Cell> {
    well_to_cell(column_to_well(key)?)
}

/// Column label with any channel suffix removed, used when echoing tables.
///
/// Keys without a separator are returned unchanged.
pub fn strip_channel_suffix(key: &str) -> &str {
    column_to_well(key).unwrap_or(key)
}

/// Distinct wells referenced by the given columns, in first-seen order.
pub fn columns_to_wells<S: AsRef<str>>(columns: &[S]) -> Result<Vec<String>> {
    let mut wells: Vec<String> = Vec::new();
    for column in columns {
        let well = column_to_well(column.as_ref())?;
        if !wells.iter().any(|seen| seen == well) {
            wells.push(well.to_string());
        }
    }
    Ok(wells)
}

/// Distinct cells referenced by the given columns, in first-seen order.
pub fn columns_to_cells<S: AsRef<str>>(columns: &[S]) -> Result<Vec<Cell>> {
    columns_to_wells(columns)?
        .iter()
        .map(|well| well_to_cell(well))
        .collect()
}
