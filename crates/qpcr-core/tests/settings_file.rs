//! Integration tests for preference file persistence.

use std::fs;

use qpcr_core::{CoreError, Settings, THRESH_FRACTION_KEY};
use tempfile::TempDir;

#[test]
fn save_writes_only_user_settable_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.json");
    let mut settings = Settings::default();
    settings.set(THRESH_FRACTION_KEY, 0.25);
    settings.save_to_file(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"DEF_THRESH_FRAC\": 0.25"));
    assert!(!text.contains("MAIN_SPLIT_LR_POS"));
    assert!(!text.contains("PGRID_ROW_SIZE"));

    let mut reloaded = Settings::default();
    let merged = reloaded.merge_from_file(&path).unwrap();
    assert_eq!(merged, settings.user_settable_keys().len());
    assert_eq!(reloaded.thresh_fraction(), 0.25);
}

#[test]
fn merge_skips_nested_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.json");
    fs::write(
        &path,
        r##"{"COLOR_CHANNEL_1": "#112233", "WINDOW": {"w": 3}, "FLAGS": [1, 2]}"##,
    )
    .unwrap();

    let mut settings = Settings::default();
    assert_eq!(settings.merge_from_file(&path).unwrap(), 1);
    assert_eq!(settings.channel_color(1), "#112233");
    assert!(settings.get("WINDOW").is_none());
}

#[test]
fn malformed_file_leaves_settings_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.json");
    fs::write(&path, "{ not json").unwrap();

    let mut settings = Settings::default();
    let err = settings.merge_from_file(&path).unwrap_err();
    assert!(matches!(err, CoreError::SettingsParse { .. }));
    assert_eq!(settings, Settings::default());

    let missing = settings
        .merge_from_file(&dir.path().join("absent.json"))
        .unwrap_err();
    assert!(matches!(missing, CoreError::SettingsIo { .. }));
}
