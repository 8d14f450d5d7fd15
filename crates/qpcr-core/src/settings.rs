//! User preferences and analysis options.
//!
//! Preferences are a flat map of string keys to numbers or strings, read
//! from and written to a JSON object. Only a few keys are interpreted here;
//! the rest are carried through for front ends.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::cq::DEFAULT_CQ_SENTINEL;
use crate::error::{CoreError, Result};

/// Key holding the default-threshold fraction of each channel's range.
pub const THRESH_FRACTION_KEY: &str = "DEF_THRESH_FRAC";

/// Key holding the preferences file name.
pub const PREFS_FNAME_KEY: &str = "PREFS_FNAME";

/// Default-threshold fraction when the setting is absent.
pub const DEFAULT_THRESH_FRACTION: f64 = 0.1;

/// Colour for channels without a configured colour, and for "All".
pub const DEFAULT_CHANNEL_COLOR: &str = "#000099";

/// Key fragments marking settings that users cannot change.
const RESERVED_KEY_PARTS: [&str; 2] = ["MAIN_", "_SIZE"];

const CHANNEL_COLOR_PREFIX: &str = "COLOR_CHANNEL_";

/// Flat preference map seeded with built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        let mut values = BTreeMap::new();
        let strings = [
            ("PREFS_FNAME", "azipa_prefs.json"),
            ("DEF_FILE_PATH", "."),
            ("COLOR_GRID_WELL_ON", "#ffff60"),
            ("COLOR_GRID_WELL_OFF", "#bbbb60"),
            ("COLOR_GRID_WELL_NONE", "#999999"),
            ("COLOR_GRID_TXT_ON", "#000000"),
            ("COLOR_GRID_TXT_OFF", "#555555"),
            ("COLOR_CHANNEL_1", "#ccaa00"),
            ("COLOR_CHANNEL_2", "#dd8822"),
            ("COLOR_CHANNEL_3", "#ff2255"),
            ("COLOR_CHANNEL_4", "#cc55cc"),
            ("COLOR_CHANNEL_5", "#5588ff"),
            ("COLOR_CHANNEL_6", "#55ffff"),
        ];
        for (key, value) in strings {
            values.insert(key.to_string(), Value::from(value));
        }
        values.insert("MAIN_SPLIT_LR_POS".to_string(), Value::from(900));
        values.insert("PGRID_ROW_SIZE".to_string(), Value::from(38));
        values.insert("PGRID_COL_SIZE".to_string(), Value::from(45));
        values.insert(
            THRESH_FRACTION_KEY.to_string(),
            Value::from(DEFAULT_THRESH_FRACTION),
        );
        Self { values }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(Value::as_f64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Store a primitive value; arrays, objects, booleans and null are ignored.
    ///
    /// Returns whether the value was stored.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let value = value.into();
        if !is_primitive(&value) {
            return false;
        }
        self.values.insert(key.into(), value);
        true
    }

    /// Fraction of the channel range used for default thresholds.
    pub fn thresh_fraction(&self) -> f64 {
        self.get_f64(THRESH_FRACTION_KEY)
            .unwrap_or(DEFAULT_THRESH_FRACTION)
    }

    /// Colour for a one-based channel index.
    pub fn channel_color(&self, idx1: i64) -> &str {
        if idx1 <= 0 {
            return DEFAULT_CHANNEL_COLOR;
        }
        self.get_str(&format!("{CHANNEL_COLOR_PREFIX}{idx1}"))
            .unwrap_or(DEFAULT_CHANNEL_COLOR)
    }

    /// Sorted keys users may change.
    pub fn user_settable_keys(&self) -> Vec<&str> {
        self.values
            .keys()
            .filter(|key| !RESERVED_KEY_PARTS.iter().any(|part| key.contains(part)))
            .map(String::as_str)
            .collect()
    }

    /// User-settable subset of the settings.
    pub fn user_settings(&self) -> BTreeMap<String, Value> {
        self.user_settable_keys()
            .into_iter()
            .filter_map(|key| {
                self.values
                    .get(key)
                    .map(|value| (key.to_string(), value.clone()))
            })
            .collect()
    }

    /// Merge primitive entries of a JSON object file into these settings.
    ///
    /// Returns the number of entries merged. On error the settings are unchanged.
    pub fn merge_from_file(&mut self, path: &Path) -> Result<usize> {
        let text = fs::read_to_string(path).map_err(|source| CoreError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let object: Map<String, Value> =
            serde_json::from_str(&text).map_err(|err| CoreError::SettingsParse {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
        let mut merged = 0;
        for (key, value) in object {
            if self.set(key, value) {
                merged += 1;
            }
        }
        debug!(path = %path.display(), merged, "merged preferences");
        Ok(merged)
    }

    /// Write user-settable entries as a JSON object.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.user_settings()).map_err(|err| {
            CoreError::SettingsParse {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        })?;
        fs::write(path, json).map_err(|source| CoreError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn is_primitive(value: &Value) -> bool {
    matches!(value, Value::Number(_) | Value::String(_))
}

/// Options that drive threshold and Cq derivation for a load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Default threshold as a fraction of each channel's range.
    pub thresh_fraction: f64,
    /// Cq reported when a column never crosses its threshold.
    pub cq_default: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            thresh_fraction: DEFAULT_THRESH_FRACTION,
            cq_default: DEFAULT_CQ_SENTINEL,
        }
    }
}

impl AnalysisOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            thresh_fraction: settings.thresh_fraction(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_thresh_fraction(mut self, fraction: f64) -> Self {
        self.thresh_fraction = fraction;
        self
    }

    #[must_use]
    pub fn with_cq_default(mut self, default: f64) -> Self {
        self.cq_default = default;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_expose_threshold_fraction_and_colors() {
        let settings = Settings::default();
        assert_eq!(settings.thresh_fraction(), 0.1);
        assert_eq!(settings.channel_color(1), "#ccaa00");
        assert_eq!(settings.channel_color(6), "#55ffff");
        assert_eq!(settings.channel_color(7), DEFAULT_CHANNEL_COLOR);
        assert_eq!(settings.channel_color(0), DEFAULT_CHANNEL_COLOR);
    }

    #[test]
    fn non_numeric_fraction_falls_back() {
        let mut settings = Settings::default();
        settings.set(THRESH_FRACTION_KEY, "half");
        assert_eq!(settings.thresh_fraction(), DEFAULT_THRESH_FRACTION);
    }

    #[test]
    fn rejects_non_primitive_values() {
        let mut settings = Settings::default();
        assert!(!settings.set("LIST", Value::Array(vec![])));
        assert!(!settings.set("FLAG", true));
        assert!(settings.get("LIST").is_none());
    }

    #[test]
    fn user_settable_keys_skip_reserved_keys() {
        let settings = Settings::default();
        let keys = settings.user_settable_keys();
        assert!(keys.contains(&"DEF_THRESH_FRAC"));
        assert!(!keys.contains(&"MAIN_SPLIT_LR_POS"));
        assert!(!keys.contains(&"PGRID_ROW_SIZE"));
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn options_follow_settings() {
        let mut settings = Settings::default();
        settings.set(THRESH_FRACTION_KEY, 0.25);
        let options = AnalysisOptions::from_settings(&settings).with_cq_default(40.0);
        assert_eq!(options.thresh_fraction, 0.25);
        assert_eq!(options.cq_default, 40.0);
    }
}
