//! Integration tests for the CLI command functions.

use std::fs;
use std::path::{Path, PathBuf};

use qpcr_cli::commands::{
    ReportRequest, apply_report_request, load_session, load_settings, run_export, run_prefs,
    run_summary,
};
use qpcr_core::THRESH_FRACTION_KEY;
use qpcr_report::{ReportKind, render_report, wells_report};
use tempfile::TempDir;

const RUN: &str = "\
Step1Channel1 FAM
Cycle,A1,B2
1,1,5
2,2,5
3,3,5
4,10,5
5,20,5
Step1Channel2 HEX
Cycle,A1,B2
1,2,1
2,2,1
3,4,1
4,8,1
5,16,1
";

fn write_run(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("run.csv");
    fs::write(&path, RUN).unwrap();
    path
}

#[test]
fn summary_lists_channels_and_status() {
    let dir = TempDir::new().unwrap();
    let path = write_run(&dir);
    let session = load_session(&path, None).unwrap();
    let lines = run_summary(&session).unwrap();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Step1Channel1 (FAM)\tCycle: 5 rows (1 to 5)\t2 cols");
    assert_eq!(
        lines[2],
        format!("Have 4 data cols, 2 channels from: {}", path.display())
    );
}

#[test]
fn report_request_filters_channels_and_wells() {
    let dir = TempDir::new().unwrap();
    let mut session = load_session(&write_run(&dir), None).unwrap();
    let request = ReportRequest {
        channels: vec![2],
        wells: vec!["A1".to_string()],
        ..ReportRequest::new(ReportKind::Wells)
    };
    apply_report_request(&mut session, &request).unwrap();
    let rows = wells_report(&session).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].column, "A1_1");
}

#[test]
fn report_request_overrides_thresholds() {
    let dir = TempDir::new().unwrap();
    let mut session = load_session(&write_run(&dir), None).unwrap();
    let request = ReportRequest {
        channels: vec![1],
        thresholds: vec![(1, 5.0)],
        ..ReportRequest::new(ReportKind::Thresholds)
    };
    apply_report_request(&mut session, &request).unwrap();
    assert_eq!(
        render_report(&session, request.kind).unwrap(),
        "Channel\tThresh\tMin\tMax\n1\t   5.0\t   0.0\t  19.0"
    );
}

#[test]
fn report_request_rejects_unknown_channel() {
    let dir = TempDir::new().unwrap();
    let mut session = load_session(&write_run(&dir), None).unwrap();
    let request = ReportRequest {
        thresholds: vec![(3, 1.0)],
        ..ReportRequest::new(ReportKind::Thresholds)
    };
    assert!(apply_report_request(&mut session, &request).is_err());
}

#[test]
fn missing_input_is_an_error() {
    let err = load_session(Path::new("/nonexistent/run.csv"), None).unwrap_err();
    assert!(format!("{err:#}").contains("plate file not found"));
}

#[test]
fn export_then_reload_keeps_columns() {
    let dir = TempDir::new().unwrap();
    let session = load_session(&write_run(&dir), None).unwrap();
    let output = dir.path().join("echo.csv");
    assert_eq!(run_export(&session, &output, false).unwrap(), 2);

    let reloaded = load_session(&output, None).unwrap();
    assert_eq!(reloaded.active_columns(), session.active_columns());
}

#[test]
fn preferences_file_changes_threshold_fraction() {
    let dir = TempDir::new().unwrap();
    let prefs = dir.path().join("prefs.json");
    fs::write(&prefs, format!("{{\"{THRESH_FRACTION_KEY}\": 0.5}}")).unwrap();

    let session = load_session(&write_run(&dir), Some(&prefs)).unwrap();
    let thresholds = session.plate().unwrap().thresholds();
    assert!((thresholds.thresholds()[0] - 9.5).abs() < 1e-9);

    let saved = dir.path().join("saved.json");
    let entries = run_prefs(&load_settings(Some(&prefs)), Some(&saved)).unwrap();
    assert!(entries.iter().any(|(key, value)| key == THRESH_FRACTION_KEY && value == "0.5"));
    assert!(saved.is_file());
}

#[test]
fn unreadable_preferences_fall_back_to_defaults() {
    let settings = load_settings(Some(Path::new("/nonexistent/prefs.json")));
    assert!((settings.thresh_fraction() - 0.1).abs() < 1e-12);
}
