//! Per-channel thresholds and Cq extraction.

use std::collections::BTreeMap;

use qpcr_model::column_to_channel_index;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dataset::PlateDataset;
use crate::derive::{ValueRange, min_max};
use crate::error::{CoreError, Result};
use crate::frame::CycleFrame;

/// Cq reported for columns that never cross their channel threshold.
pub const DEFAULT_CQ_SENTINEL: f64 = 100.0;

/// Per-channel min, max and threshold, indexed by channel position.
///
/// Min and max come from the baseline-corrected frame and are fixed at load;
/// thresholds may be adjusted afterwards and reset to their load-time value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelThresholds {
    mins: Vec<f64>,
    maxs: Vec<f64>,
    thresholds: Vec<f64>,
    defaults: Vec<f64>,
}

impl ChannelThresholds {
    /// Default thresholds at `fraction` of each channel's baseline-corrected range.
    pub fn from_baseline(
        dataset: &PlateDataset,
        baseline: &CycleFrame,
        fraction: f64,
    ) -> Result<Self> {
        let mut stats = Self::default();
        for (idx, channel) in dataset.channels().iter().enumerate() {
            let columns = dataset.channel_columns(idx);
            let range = match min_max(&baseline.select_columns(&columns)?, None)? {
                Some(range) => range,
                None => {
                    warn!(
                        channel = %channel.key,
                        "channel has no values; using zero threshold range"
                    );
                    ValueRange::new(0.0, 0.0)
                }
            };
            let threshold = range.fraction(fraction);
            stats.mins.push(range.min);
            stats.maxs.push(range.max);
            stats.thresholds.push(threshold);
            stats.defaults.push(threshold);
        }
        Ok(stats)
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    pub fn mins(&self) -> &[f64] {
        &self.mins
    }

    pub fn maxs(&self) -> &[f64] {
        &self.maxs
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn threshold(&self, idx: usize) -> Option<f64> {
        self.thresholds.get(idx).copied()
    }

    pub fn default_threshold(&self, idx: usize) -> Option<f64> {
        self.defaults.get(idx).copied()
    }

    /// Baseline-corrected range of one channel.
    pub fn range(&self, idx: usize) -> Option<ValueRange> {
        Some(ValueRange::new(*self.mins.get(idx)?, *self.maxs.get(idx)?))
    }

    pub(crate) fn set(&mut self, idx: usize, value: f64) -> Result<()> {
        let count = self.thresholds.len();
        let slot = self
            .thresholds
            .get_mut(idx)
            .ok_or(CoreError::ChannelOutOfRange { index: idx, count })?;
        *slot = value;
        Ok(())
    }

    pub(crate) fn reset(&mut self, idx: usize) -> Result<f64> {
        let value = self
            .default_threshold(idx)
            .ok_or(CoreError::ChannelOutOfRange {
                index: idx,
                count: self.defaults.len(),
            })?;
        self.set(idx, value)?;
        Ok(value)
    }
}

/// Fractional position where `values` first rises above `threshold`.
///
/// For the first index `i > 0` with `values[i] > threshold` and
/// `values[i-1] <= threshold` the result is
/// `i + (threshold - values[i-1]) / (values[i] - values[i-1])`.
/// A first sample already above the threshold is not a crossing; scanning
/// continues past it. Returns `default` when no crossing exists.
pub fn threshold_crossing_position(values: &[f64], threshold: f64, default: f64) -> f64 {
    values
        .windows(2)
        .enumerate()
        .find_map(|(prev, pair)| {
            let (before, after) = (pair[0], pair[1]);
            (after > threshold && before <= threshold)
                .then(|| (prev + 1) as f64 + (threshold - before) / (after - before))
        })
        .unwrap_or(default)
}

/// Index value at the first maximum of `values`; NaN values are skipped.
pub fn peak_position(values: &[f64], index: &[f64]) -> Option<f64> {
    let mut best: Option<(usize, f64)> = None;
    for (pos, value) in values.iter().copied().enumerate() {
        if value.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, max)| value > max) {
            best = Some((pos, value));
        }
    }
    best.and_then(|(pos, _)| index.get(pos).copied())
}

/// Threshold-crossing Cq for every column of the baseline-corrected frame.
pub fn threshold_cq_map(
    baseline: &CycleFrame,
    thresholds: &ChannelThresholds,
    default: f64,
) -> Result<BTreeMap<String, f64>> {
    let mut cqs = BTreeMap::new();
    for column in baseline.column_names() {
        let channel = column_to_channel_index(&column)?;
        let threshold = thresholds
            .threshold(channel)
            .ok_or(CoreError::ChannelOutOfRange {
                index: channel,
                count: thresholds.len(),
            })?;
        let values = baseline.column_values_nan(&column)?;
        let cq = threshold_crossing_position(&values, threshold, default);
        cqs.insert(column, cq);
    }
    debug!(columns = cqs.len(), "computed threshold-crossing Cq values");
    Ok(cqs)
}

/// Second-derivative peak Cq for every column; `None` for columns without values.
pub fn second_derivative_cq_map(second: &CycleFrame) -> Result<BTreeMap<String, Option<f64>>> {
    let index = second.index_values()?;
    let mut cqs = BTreeMap::new();
    for column in second.column_names() {
        let values = second.column_values_nan(&column)?;
        let peak = peak_position(&values, &index);
        cqs.insert(column, peak);
    }
    Ok(cqs)
}
