//! Command implementations shared by the `qpcr` binary and its tests.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use qpcr_core::{Session, Settings};
use qpcr_ingest::{IngestOptions, load_plate_file};
use qpcr_model::{Cell, well_to_cell};
use qpcr_report::{DetailOptions, EchoOptions, ReportKind, dataset_details, write_plate_echo};

/// What a `report` invocation should show.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub kind: ReportKind,
    /// One-based channel numbers to keep active; all when empty.
    pub channels: Vec<usize>,
    /// Wells to keep active; all data wells when empty.
    pub wells: Vec<String>,
    /// One-based channel number and threshold value.
    pub thresholds: Vec<(usize, f64)>,
}

impl ReportRequest {
    pub fn new(kind: ReportKind) -> Self {
        Self {
            kind,
            channels: Vec::new(),
            wells: Vec::new(),
            thresholds: Vec::new(),
        }
    }
}

/// Settings from built-in defaults, merged with a preferences file when given.
///
/// An unreadable preferences file is logged and otherwise ignored.
pub fn load_settings(prefs: Option<&Path>) -> Settings {
    let mut settings = Settings::default();
    if let Some(path) = prefs {
        match settings.merge_from_file(path) {
            Ok(count) => info!(path = %path.display(), count, "merged preferences"),
            Err(error) => warn!(path = %path.display(), %error, "ignoring preferences file"),
        }
    }
    settings
}

/// Create a session and load `file` into it.
pub fn load_session(file: &Path, prefs: Option<&Path>) -> Result<Session> {
    let span = info_span!("load", file = %file.display());
    let _guard = span.enter();
    let mut session = Session::new(load_settings(prefs));
    load_plate_file(&mut session, file, &IngestOptions::default())
        .with_context(|| format!("load {}", file.display()))?;
    Ok(session)
}

/// Channel detail lines followed by the status line.
pub fn run_summary(session: &Session) -> Result<Vec<String>> {
    let mut lines = match session.dataset() {
        Some(dataset) => dataset_details(dataset, &DetailOptions::default())?,
        None => Vec::new(),
    };
    lines.push(session.status_text());
    Ok(lines)
}

/// Apply channel, well and threshold adjustments ahead of a report.
pub fn apply_report_request(session: &mut Session, request: &ReportRequest) -> Result<()> {
    let count = session.dataset().map_or(0, |dataset| dataset.num_channels());
    for &(channel, value) in &request.thresholds {
        let idx = channel_index(channel, count)?;
        session
            .set_channel_threshold(idx, value)
            .with_context(|| format!("set threshold for channel {channel}"))?;
    }
    if !request.channels.is_empty() {
        let channels = request
            .channels
            .iter()
            .map(|&channel| channel_index(channel, count))
            .collect::<Result<Vec<_>>>()?;
        session.set_active_channels(channels);
    }
    if !request.wells.is_empty() {
        let cells = request
            .wells
            .iter()
            .map(|well| well_to_cell(well).with_context(|| format!("well {well}")))
            .collect::<Result<Vec<Cell>>>()?;
        session.select_no_cells();
        session.modify_active_cells(&cells, &[]);
    }
    Ok(())
}

/// Write the dataset echo to `output`, returning the number of channels written.
pub fn run_export(session: &Session, output: &Path, comments: bool) -> Result<usize> {
    let Some(dataset) = session.dataset() else {
        bail!("no dataset loaded");
    };
    let written = write_plate_echo(
        dataset,
        output,
        &EchoOptions::default().with_comments(comments),
    )
    .with_context(|| format!("export {}", output.display()))?;
    Ok(written)
}

/// Effective user-settable settings, optionally saved to `save`.
pub fn run_prefs(settings: &Settings, save: Option<&Path>) -> Result<Vec<(String, String)>> {
    if let Some(path) = save {
        settings
            .save_to_file(path)
            .with_context(|| format!("save preferences to {}", path.display()))?;
        info!(path = %path.display(), "saved preferences");
    }
    Ok(settings
        .user_settings()
        .into_iter()
        .map(|(key, value)| {
            let text = value
                .as_str()
                .map_or_else(|| value.to_string(), str::to_string);
            (key, text)
        })
        .collect())
}

fn channel_index(channel: usize, count: usize) -> Result<usize> {
    if channel == 0 || channel > count {
        bail!("channel {channel} is not in 1..={count}");
    }
    Ok(channel - 1)
}
