//! Multi-channel plate dataset.

use qpcr_model::{ChannelSelector, channel_index_suffix, column_to_channel_index};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::frame::CycleFrame;

/// Identity of one loaded channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Source key from the run export, e.g. `Step1Channel2`.
    pub key: String,
    /// Display name, possibly empty.
    pub name: String,
}

/// Collection of per-channel tables merged into one cycle-indexed frame.
///
/// Channels keep their insertion order; value columns of the n-th channel
/// are suffixed `_n` (zero-based).
#[derive(Debug, Clone, Default)]
pub struct PlateDataset {
    source: String,
    channels: Vec<ChannelInfo>,
    frame: Option<CycleFrame>,
}

impl PlateDataset {
    /// Create an empty dataset labelled with its source (usually a file name).
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Append one channel table.
    ///
    /// Column names of `table` are suffixed with the new channel's index.
    /// The dataset is left unchanged when the key is already present or when
    /// the table's row count or index name differs from the existing frame.
    pub fn add_channel(
        &mut self,
        table: &CycleFrame,
        key: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<()> {
        let key = key.into();
        if self.channels.iter().any(|channel| channel.key == key) {
            return Err(CoreError::DuplicateChannel { channel: key });
        }
        let suffix = channel_index_suffix(self.channels.len());
        let renamed = table.rename_columns(|column| format!("{column}{suffix}"))?;
        let merged = match &self.frame {
            None => renamed,
            Some(existing) => {
                if existing.height() != renamed.height()
                    || existing.index_name() != renamed.index_name()
                {
                    return Err(CoreError::RowMismatch {
                        expected_rows: existing.height(),
                        found_rows: renamed.height(),
                        expected_index: existing.index_name().to_string(),
                        found_index: renamed.index_name().to_string(),
                    });
                }
                existing.hstack(&renamed)?
            }
        };
        debug!(
            channel = %key,
            index = self.channels.len(),
            columns = table.width(),
            rows = table.height(),
            "added channel table"
        );
        self.frame = Some(merged);
        self.channels.push(ChannelInfo {
            key,
            name: name.into(),
        });
        Ok(())
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn channels(&self) -> &[ChannelInfo] {
        &self.channels
    }

    /// Channel source keys in load order.
    pub fn channel_keys(&self) -> Vec<&str> {
        self.channels.iter().map(|channel| channel.key.as_str()).collect()
    }

    /// Channel display names in load order.
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels
            .iter()
            .map(|channel| channel.name.as_str())
            .collect()
    }

    /// Merged frame of every channel; `None` until a channel is added.
    pub fn frame(&self) -> Option<&CycleFrame> {
        self.frame.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_none()
    }

    /// Column keys for a one-based channel index.
    ///
    /// `0` returns every column, `n > 0` the columns of channel `n`, and a
    /// negative index (or an empty dataset) returns nothing.
    pub fn channel_columns_for_index1(&self, idx1: i64) -> Vec<String> {
        let Some(frame) = &self.frame else {
            return Vec::new();
        };
        match ChannelSelector::from_1index(idx1) {
            ChannelSelector::None => Vec::new(),
            ChannelSelector::All => frame.column_names(),
            ChannelSelector::Channel(idx) => self.filter_channel(frame, idx),
        }
    }

    /// Column keys for a zero-based channel index.
    pub fn channel_columns(&self, idx: usize) -> Vec<String> {
        self.frame
            .as_ref()
            .map(|frame| self.filter_channel(frame, idx))
            .unwrap_or_default()
    }

    fn filter_channel(&self, frame: &CycleFrame, idx: usize) -> Vec<String> {
        frame
            .column_names()
            .into_iter()
            .filter(|column| column_to_channel_index(column).is_ok_and(|channel| channel == idx))
            .collect()
    }

    /// Frame holding only the columns of one zero-based channel.
    pub fn channel_frame(&self, idx: usize) -> Result<CycleFrame> {
        if idx >= self.channels.len() {
            return Err(CoreError::ChannelOutOfRange {
                index: idx,
                count: self.channels.len(),
            });
        }
        let frame = self.frame.as_ref().ok_or(CoreError::NoDataset)?;
        frame.select_columns(&self.channel_columns(idx))
    }
}
