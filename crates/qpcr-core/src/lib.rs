//! Analysis core for multi-channel 96-well qPCR runs.
//!
//! # Pipeline
//!
//! 1. **Dataset**: per-channel tables merged into one cycle-indexed frame
//!    ([`PlateDataset`])
//! 2. **Derived frames**: baseline-corrected, first and second derivative
//!    ([`baseline_correct`], [`first_derivative`], [`second_derivative`])
//! 3. **Thresholds and Cq**: per-channel default thresholds and per-column
//!    threshold-crossing and second-derivative-peak Cq ([`ChannelThresholds`])
//! 4. **Selection**: active channels and cells filtering the columns shown
//!    ([`Selection`])
//!
//! A [`Session`] owns one loaded dataset with all derived state and replaces
//! it atomically on each load.

pub mod cq;
pub mod dataset;
pub mod derive;
pub mod error;
pub mod frame;
pub mod selection;
pub mod session;
pub mod settings;

pub use cq::{
    ChannelThresholds, DEFAULT_CQ_SENTINEL, peak_position, second_derivative_cq_map,
    threshold_cq_map, threshold_crossing_position,
};
pub use dataset::{ChannelInfo, PlateDataset};
pub use derive::{
    PLOT_XDELTA_MIN, PLOT_YDELTA_MIN, ValueRange, baseline_correct, column_min_max,
    first_derivative, min_max, row_index_min_max, second_derivative,
};
pub use error::{CoreError, Result};
pub use frame::CycleFrame;
pub use selection::Selection;
pub use session::{FrameKind, PlateState, Session};
pub use settings::{
    AnalysisOptions, DEFAULT_CHANNEL_COLOR, DEFAULT_THRESH_FRACTION, PREFS_FNAME_KEY,
    Settings, THRESH_FRACTION_KEY,
};
