//! Tabular reports over the active selection.

use std::fmt;
use std::str::FromStr;

use qpcr_core::{Session, column_min_max};
use qpcr_model::{column_to_channel_index, column_to_well};
use serde::Serialize;

use crate::error::Result;

/// Available reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Wells,
    Channels,
    Thresholds,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Wells => "wells",
            ReportKind::Channels => "channels",
            ReportKind::Thresholds => "thresholds",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        if upper.starts_with("WELL") {
            Ok(ReportKind::Wells)
        } else if upper.starts_with("CHAN") {
            Ok(ReportKind::Channels)
        } else if upper.starts_with("THRESH") {
            Ok(ReportKind::Thresholds)
        } else {
            Err(format!("unknown report: {s}"))
        }
    }
}

/// One active column in the wells report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellReportRow {
    pub column: String,
    pub well: String,
    /// One-based channel number.
    pub channel: usize,
    pub cq_threshold: f64,
    pub cq_second_derivative: Option<f64>,
    /// Range of the baseline-corrected values.
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// One active channel in the channels report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelReportRow {
    pub channel: usize,
    pub wells: usize,
    pub name: String,
}

/// One active channel in the thresholds report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdReportRow {
    pub channel: usize,
    pub threshold: f64,
    pub min: f64,
    pub max: f64,
}

/// Active columns sorted by key, with Cq values and baseline range.
pub fn wells_report(session: &Session) -> Result<Vec<WellReportRow>> {
    let Some(plate) = session.plate() else {
        return Ok(Vec::new());
    };
    let mut columns = session.active_columns();
    columns.sort();

    let mut rows = Vec::with_capacity(columns.len());
    for column in columns {
        let well = column_to_well(&column).map_err(qpcr_core::CoreError::from)?;
        let channel = column_to_channel_index(&column).map_err(qpcr_core::CoreError::from)?;
        let range = column_min_max(plate.baseline(), &column)?;
        rows.push(WellReportRow {
            well: well.to_string(),
            channel: channel + 1,
            cq_threshold: plate
                .cq_threshold()
                .get(&column)
                .copied()
                .unwrap_or(plate.options().cq_default),
            cq_second_derivative: plate.cq_second_derivative().get(&column).copied().flatten(),
            min: range.map(|range| range.min),
            max: range.map(|range| range.max),
            column,
        });
    }
    Ok(rows)
}

/// Active channels with the number of active columns in each.
pub fn channels_report(session: &Session) -> Vec<ChannelReportRow> {
    let Some(dataset) = session.dataset() else {
        return Vec::new();
    };
    let active = session.active_columns();
    session
        .active_channels()
        .into_iter()
        .map(|idx| ChannelReportRow {
            channel: idx + 1,
            wells: active
                .iter()
                .filter(|column| column_to_channel_index(column).is_ok_and(|c| c == idx))
                .count(),
            name: dataset
                .channels()
                .get(idx)
                .map(|channel| channel.name.clone())
                .unwrap_or_default(),
        })
        .collect()
}

/// Current threshold and baseline range of each active channel.
pub fn thresholds_report(session: &Session) -> Vec<ThresholdReportRow> {
    let Some(plate) = session.plate() else {
        return Vec::new();
    };
    let thresholds = plate.thresholds();
    session
        .active_channels()
        .into_iter()
        .filter_map(|idx| {
            let range = thresholds.range(idx)?;
            Some(ThresholdReportRow {
                channel: idx + 1,
                threshold: thresholds.threshold(idx)?,
                min: range.min,
                max: range.max,
            })
        })
        .collect()
}

/// Render the tab-delimited wells report.
pub fn render_wells_report(rows: &[WellReportRow]) -> String {
    let mut lines = vec!["Well\tChannel\tCqTh\tCq2d\tMin\tMax".to_string()];
    lines.extend(rows.iter().map(|row| {
        format!(
            "{}\t{}\t{:5.2}\t{}\t{}\t{}",
            row.well,
            row.channel,
            row.cq_threshold,
            row.cq_second_derivative
                .map_or_else(|| " -".to_string(), |cq| format!("{cq:2}")),
            format_optional(row.min),
            format_optional(row.max),
        )
    }));
    lines.join("\n")
}

/// Render the tab-delimited channels report.
pub fn render_channels_report(rows: &[ChannelReportRow]) -> String {
    let mut lines = vec!["Channel\tWells\tName".to_string()];
    lines.extend(
        rows.iter()
            .map(|row| format!("{}\t{:2}\t{}", row.channel, row.wells, row.name)),
    );
    lines.join("\n")
}

/// Render the tab-delimited thresholds report.
pub fn render_thresholds_report(rows: &[ThresholdReportRow]) -> String {
    let mut lines = vec!["Channel\tThresh\tMin\tMax".to_string()];
    lines.extend(rows.iter().map(|row| {
        format!(
            "{}\t{:6.1}\t{:6.1}\t{:6.1}",
            row.channel, row.threshold, row.min, row.max
        )
    }));
    lines.join("\n")
}

/// Build and render one report.
pub fn render_report(session: &Session, kind: ReportKind) -> Result<String> {
    Ok(match kind {
        ReportKind::Wells => render_wells_report(&wells_report(session)?),
        ReportKind::Channels => render_channels_report(&channels_report(session)),
        ReportKind::Thresholds => render_thresholds_report(&thresholds_report(session)),
    })
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "   -".to_string(), |value| format!("{value:5.2}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_report_kind_prefixes() {
        assert_eq!("wells".parse::<ReportKind>(), Ok(ReportKind::Wells));
        assert_eq!("CHANNEL".parse::<ReportKind>(), Ok(ReportKind::Channels));
        assert_eq!("thresh".parse::<ReportKind>(), Ok(ReportKind::Thresholds));
        assert!("plots".parse::<ReportKind>().is_err());
    }

    #[test]
    fn empty_session_renders_headers_only() {
        let session = Session::default();
        assert_eq!(
            render_report(&session, ReportKind::Wells).unwrap(),
            "Well\tChannel\tCqTh\tCq2d\tMin\tMax"
        );
        assert_eq!(
            render_report(&session, ReportKind::Thresholds).unwrap(),
            "Channel\tThresh\tMin\tMax"
        );
    }

    #[test]
    fn missing_values_render_as_dashes() {
        let rows = vec![WellReportRow {
            column: "C3_0".to_string(),
            well: "C3".to_string(),
            channel: 1,
            cq_threshold: 100.0,
            cq_second_derivative: None,
            min: None,
            max: None,
        }];
        assert_eq!(
            render_wells_report(&rows),
            "Well\tChannel\tCqTh\tCq2d\tMin\tMax\nC3\t1\t100.00\t -\t   -\t   -"
        );
    }
}
