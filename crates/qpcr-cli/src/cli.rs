//! CLI argument definitions for `qpcr`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use qpcr_report::ReportKind;

#[derive(Parser)]
#[command(
    name = "qpcr",
    version,
    about = "Inspect multi-channel 96-well qPCR runs",
    long_about = "Load a plate reader export with one block per fluorescence channel,\n\
                  derive baseline-corrected and derivative curves, and report\n\
                  threshold and second-derivative Cq values per well."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Preferences file merged over the built-in defaults.
    #[arg(long = "prefs", value_name = "PATH", global = true)]
    pub prefs: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Describe each channel table and the loaded columns.
    Summary(FileArgs),

    /// Print a wells, channels or thresholds report.
    Report(ReportArgs),

    /// Write the dataset back out in plate reader layout.
    Export(ExportArgs),

    /// Show the effective preferences.
    Prefs(PrefsArgs),
}

#[derive(Args)]
pub struct FileArgs {
    /// Plate reader export to load.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ReportArgs {
    /// Plate reader export to load.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Report to print.
    #[arg(long = "kind", value_enum, default_value = "wells")]
    pub kind: ReportKindArg,

    /// Limit to these one-based channels (repeatable).
    #[arg(long = "channel", value_name = "N")]
    pub channels: Vec<usize>,

    /// Limit to these wells, e.g. `A1` (repeatable).
    #[arg(long = "well", value_name = "WELL")]
    pub wells: Vec<String>,

    /// Override a channel threshold, e.g. `2=150.5` (repeatable).
    #[arg(long = "threshold", value_name = "N=VALUE", value_parser = parse_threshold)]
    pub thresholds: Vec<(usize, f64)>,

    /// Print tab-delimited text instead of a table.
    #[arg(long = "plain")]
    pub plain: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Plate reader export to load.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output path.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: PathBuf,

    /// Omit the `#` comment lines.
    #[arg(long = "no-comments")]
    pub no_comments: bool,
}

#[derive(Args)]
pub struct PrefsArgs {
    /// Also save the effective preferences to this file.
    #[arg(long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportKindArg {
    Wells,
    Channels,
    Thresholds,
}

impl From<ReportKindArg> for ReportKind {
    fn from(kind: ReportKindArg) -> Self {
        match kind {
            ReportKindArg::Wells => ReportKind::Wells,
            ReportKindArg::Channels => ReportKind::Channels,
            ReportKindArg::Thresholds => ReportKind::Thresholds,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_threshold(text: &str) -> Result<(usize, f64), String> {
    let (channel, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected N=VALUE, got '{text}'"))?;
    let channel = channel
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("bad channel '{channel}': {e}"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad threshold '{value}': {e}"))?;
    if !value.is_finite() {
        return Err(format!("threshold must be finite, got '{value}'"));
    }
    Ok((channel, value))
}
