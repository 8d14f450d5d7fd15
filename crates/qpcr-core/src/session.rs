//! Analysis session: the loaded dataset, its derived state and selections.

use std::collections::{BTreeMap, BTreeSet};

use qpcr_model::{Cell, cell_to_well};
use tracing::{debug, info, info_span};

use crate::cq::{ChannelThresholds, second_derivative_cq_map, threshold_cq_map};
use crate::dataset::PlateDataset;
use crate::derive::{baseline_correct, first_derivative, second_derivative};
use crate::error::{CoreError, Result};
use crate::frame::CycleFrame;
use crate::selection::Selection;
use crate::settings::{AnalysisOptions, Settings};

/// Everything derived from one loaded dataset.
///
/// Built in full by [`PlateState::build`]; only thresholds and the
/// threshold-crossing Cq map change afterwards.
#[derive(Debug, Clone)]
pub struct PlateState {
    dataset: PlateDataset,
    raw: CycleFrame,
    baseline: CycleFrame,
    first_derivative: CycleFrame,
    second_derivative: CycleFrame,
    thresholds: ChannelThresholds,
    cq_threshold: BTreeMap<String, f64>,
    cq_second_derivative: BTreeMap<String, Option<f64>>,
    options: AnalysisOptions,
}

impl PlateState {
    /// Derive frames, thresholds and Cq maps for `dataset`.
    pub fn build(dataset: PlateDataset, options: AnalysisOptions) -> Result<Self> {
        let raw = dataset.frame().cloned().ok_or(CoreError::NoDataset)?;
        let baseline = baseline_correct(&raw)?;
        let first = first_derivative(&raw)?;
        let second = second_derivative(&raw)?;
        let thresholds =
            ChannelThresholds::from_baseline(&dataset, &baseline, options.thresh_fraction)?;
        let cq_second_derivative = second_derivative_cq_map(&second)?;
        let cq_threshold = threshold_cq_map(&baseline, &thresholds, options.cq_default)?;
        Ok(Self {
            dataset,
            raw,
            baseline,
            first_derivative: first,
            second_derivative: second,
            thresholds,
            cq_threshold,
            cq_second_derivative,
            options,
        })
    }

    pub fn dataset(&self) -> &PlateDataset {
        &self.dataset
    }

    pub fn raw(&self) -> &CycleFrame {
        &self.raw
    }

    pub fn baseline(&self) -> &CycleFrame {
        &self.baseline
    }

    pub fn first_derivative(&self) -> &CycleFrame {
        &self.first_derivative
    }

    pub fn second_derivative(&self) -> &CycleFrame {
        &self.second_derivative
    }

    pub fn frame(&self, kind: FrameKind) -> &CycleFrame {
        match kind {
            FrameKind::Raw => &self.raw,
            FrameKind::Baseline => &self.baseline,
            FrameKind::FirstDerivative => &self.first_derivative,
            FrameKind::SecondDerivative => &self.second_derivative,
        }
    }

    pub fn thresholds(&self) -> &ChannelThresholds {
        &self.thresholds
    }

    /// Threshold-crossing Cq per column key.
    pub fn cq_threshold(&self) -> &BTreeMap<String, f64> {
        &self.cq_threshold
    }

    /// Second-derivative peak Cq per column key.
    pub fn cq_second_derivative(&self) -> &BTreeMap<String, Option<f64>> {
        &self.cq_second_derivative
    }

    pub fn options(&self) -> AnalysisOptions {
        self.options
    }

    fn set_threshold(&mut self, idx: usize, value: f64) -> Result<()> {
        self.thresholds.set(idx, value)?;
        self.recompute_threshold_cq()
    }

    fn reset_threshold(&mut self, idx: usize) -> Result<f64> {
        let value = self.thresholds.reset(idx)?;
        self.recompute_threshold_cq()?;
        Ok(value)
    }

    fn recompute_threshold_cq(&mut self) -> Result<()> {
        self.cq_threshold =
            threshold_cq_map(&self.baseline, &self.thresholds, self.options.cq_default)?;
        Ok(())
    }
}

/// Which of the four frames to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameKind {
    Raw,
    #[default]
    Baseline,
    FirstDerivative,
    SecondDerivative,
}

/// The working context of one analysis front end.
///
/// Holds user settings, at most one loaded dataset with its derived state,
/// and the channel/cell selection. Queries made with no dataset loaded return
/// empty results; mutations that need a dataset fail with
/// [`CoreError::NoDataset`].
#[derive(Debug, Clone)]
pub struct Session {
    settings: Settings,
    plate: Option<PlateState>,
    selection: Selection,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            plate: None,
            selection: Selection::empty(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn have_dataset(&self) -> bool {
        self.plate.is_some()
    }

    pub fn plate(&self) -> Option<&PlateState> {
        self.plate.as_ref()
    }

    pub fn dataset(&self) -> Option<&PlateDataset> {
        self.plate.as_ref().map(PlateState::dataset)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replace the loaded dataset and all derived state.
    ///
    /// Everything is computed before anything is replaced, so on error the
    /// previous dataset and selection remain in place.
    pub fn install_dataset(&mut self, dataset: PlateDataset) -> Result<()> {
        let span = info_span!("install_dataset", source = %dataset.source());
        let _guard = span.enter();
        let options = AnalysisOptions::from_settings(&self.settings);
        let selection = Selection::for_dataset(&dataset);
        let plate = PlateState::build(dataset, options)?;
        let (rows, columns) = plate.raw().shape();
        info!(
            channels = plate.dataset().num_channels(),
            columns,
            rows,
            data_cells = selection.any_data_cells().len(),
            "dataset installed"
        );
        self.plate = Some(plate);
        self.selection = selection;
        Ok(())
    }

    /// Drop the loaded dataset.
    pub fn clear(&mut self) {
        self.plate = None;
        self.selection = Selection::empty();
    }

    /// Column keys for a one-based channel index; empty with no dataset.
    pub fn channel_columns_for_index1(&self, idx1: i64) -> Vec<String> {
        self.dataset()
            .map(|dataset| dataset.channel_columns_for_index1(idx1))
            .unwrap_or_default()
    }

    /// Active columns in dataset order; empty with no dataset.
    pub fn active_columns(&self) -> Vec<String> {
        self.dataset()
            .map(|dataset| self.selection.active_columns(dataset))
            .unwrap_or_default()
    }

    pub fn active_channels(&self) -> Vec<usize> {
        self.selection.active_channels().iter().copied().collect()
    }

    pub fn active_cells(&self) -> Vec<Cell> {
        self.selection.active_cells().iter().copied().collect()
    }

    /// Well labels of the active cells.
    pub fn active_wells(&self) -> Vec<&'static str> {
        self.selection
            .active_cells()
            .iter()
            .filter_map(|cell| cell_to_well(*cell).ok())
            .collect()
    }

    pub fn any_data_cells(&self) -> &BTreeSet<Cell> {
        self.selection.any_data_cells()
    }

    pub fn no_data_cells(&self) -> &BTreeSet<Cell> {
        self.selection.no_data_cells()
    }

    /// Replace the active channel set; indices beyond the channel count are dropped.
    pub fn set_active_channels(&mut self, channels: impl IntoIterator<Item = usize>) {
        let count = self.dataset().map_or(0, PlateDataset::num_channels);
        self.selection
            .set_active_channels(channels.into_iter().filter(|idx| *idx < count));
    }

    /// See [`Selection::modify_active_cells`].
    pub fn modify_active_cells(&mut self, add: &[Cell], remove: &[Cell]) -> usize {
        self.selection.modify_active_cells(add, remove)
    }

    pub fn select_all_cells(&mut self) -> usize {
        self.selection.select_all_cells()
    }

    pub fn select_no_cells(&mut self) -> usize {
        self.selection.select_no_cells()
    }

    /// Set one channel's threshold and recompute threshold-crossing Cq values.
    pub fn set_channel_threshold(&mut self, idx: usize, value: f64) -> Result<()> {
        let plate = self.plate.as_mut().ok_or(CoreError::NoDataset)?;
        plate.set_threshold(idx, value)?;
        debug!(channel = idx, threshold = value, "channel threshold set");
        Ok(())
    }

    /// Restore one channel's load-time threshold; returns the restored value.
    pub fn reset_channel_threshold(&mut self, idx: usize) -> Result<f64> {
        let plate = self.plate.as_mut().ok_or(CoreError::NoDataset)?;
        let value = plate.reset_threshold(idx)?;
        debug!(channel = idx, threshold = value, "channel threshold reset");
        Ok(value)
    }

    /// Display colour for a one-based channel index.
    pub fn channel_color(&self, idx1: i64) -> &str {
        self.settings.channel_color(idx1)
    }

    /// One-line description of what is loaded.
    pub fn status_text(&self) -> String {
        match self.dataset() {
            None => "Nothing loaded ...".to_string(),
            Some(dataset) => format!(
                "Have {} data cols, {} channels from: {}",
                dataset.channel_columns_for_index1(0).len(),
                dataset.num_channels(),
                dataset.source()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_is_empty() {
        let session = Session::default();
        assert!(!session.have_dataset());
        assert!(session.active_columns().is_empty());
        assert!(session.channel_columns_for_index1(0).is_empty());
        assert_eq!(session.no_data_cells().len(), 96);
        assert_eq!(session.status_text(), "Nothing loaded ...");
        assert!(matches!(
            Session::default().set_channel_threshold(0, 1.0),
            Err(CoreError::NoDataset)
        ));
    }

    #[test]
    fn installing_empty_dataset_fails_without_state_change() {
        let mut session = Session::default();
        let err = session
            .install_dataset(PlateDataset::new("empty.csv"))
            .unwrap_err();
        assert!(matches!(err, CoreError::NoDataset));
        assert!(!session.have_dataset());
    }
}
