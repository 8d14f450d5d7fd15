//! Report and export generation for loaded plate datasets.
//!
//! - **Echo export**: the dataset written back in the block layout read by
//!   `qpcr-ingest`, with optional comment header
//! - **Details**: one summary line per channel table
//! - **Reports**: wells, channels and thresholds over the active selection,
//!   as structured rows or tab-delimited text

mod details;
mod echo;
mod error;
mod reports;

pub use details::{DetailOptions, dataset_details};
pub use echo::{EchoOptions, MISSING_VALUE, write_plate_echo, write_plate_echo_to};
pub use error::{ReportError, Result};
pub use reports::{
    ChannelReportRow, ReportKind, ThresholdReportRow, WellReportRow, channels_report,
    render_channels_report, render_report, render_thresholds_report, render_wells_report,
    thresholds_report, wells_report,
};
