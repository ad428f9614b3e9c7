//! Round settings
//!
//! Tunables for round pacing and rest detection. Loaded from a JSON file by
//! the native binary; missing fields take their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{COMPLETION_HOLD_SECONDS, PRE_ROUND_SECONDS};
use crate::error::SettingsError;

/// Round pacing and settle detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundSettings {
    /// Pre-round countdown length (seconds)
    pub pre_round_seconds: f32,
    /// How long all pickups must stay in and at rest before the round is won
    pub completion_hold_seconds: f32,
    /// Bodies with linear and angular speed at or below this are at rest.
    /// 0.0 means only a fully stopped body counts.
    pub rest_speed_epsilon: f32,
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self {
            pre_round_seconds: PRE_ROUND_SECONDS,
            completion_hold_seconds: COMPLETION_HOLD_SECONDS,
            rest_speed_epsilon: 0.0,
        }
    }
}

impl RoundSettings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file
    pub fn read(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from disk, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded round settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) => {
                log::info!("Using default round settings ({}: {})", path.display(), e);
                Self::default()
            }
            Err(e) => {
                log::warn!("Rejected {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Check every value is finite and non-negative
    pub fn validate(&self) -> Result<(), SettingsError> {
        let fields = [
            ("pre_round_seconds", self.pre_round_seconds),
            ("completion_hold_seconds", self.completion_hold_seconds),
            ("rest_speed_epsilon", self.rest_speed_epsilon),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::OutOfRange { field, value });
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let settings = RoundSettings::default();
        assert_eq!(settings.pre_round_seconds, 5.0);
        assert_eq!(settings.completion_hold_seconds, 3.0);
        assert_eq!(settings.rest_speed_epsilon, 0.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = RoundSettings::from_json(r#"{ "completion_hold_seconds": 1.5 }"#).unwrap();
        assert_eq!(settings.completion_hold_seconds, 1.5);
        assert_eq!(settings.pre_round_seconds, 5.0);
    }

    #[test]
    fn test_negative_duration_rejected() {
        let err = RoundSettings::from_json(r#"{ "pre_round_seconds": -1.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::OutOfRange {
                field: "pre_round_seconds",
                ..
            }
        ));
    }

    #[test]
    fn test_garbage_json_is_parse_error() {
        let err = RoundSettings::from_json("not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let settings = RoundSettings::load(Path::new("/nonexistent/forklift/round.json"));
        assert_eq!(settings, RoundSettings::default());
    }

    #[test]
    fn test_load_malformed_file_uses_defaults() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "pre_round_seconds": "#).unwrap();
        assert!(matches!(
            RoundSettings::read(file.path()),
            Err(SettingsError::Parse(_))
        ));
        assert_eq!(RoundSettings::load(file.path()), RoundSettings::default());
    }

    #[test]
    fn test_load_out_of_range_file_uses_defaults() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "completion_hold_seconds": -2.0 }"#).unwrap();
        assert_eq!(RoundSettings::load(file.path()), RoundSettings::default());
    }

    #[test]
    fn test_load_valid_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "pre_round_seconds": 2.5 }"#).unwrap();
        assert_eq!(RoundSettings::load(file.path()).pre_round_seconds, 2.5);
    }

    #[test]
    fn test_json_survives_reload() {
        let settings = RoundSettings {
            pre_round_seconds: 2.0,
            completion_hold_seconds: 4.0,
            rest_speed_epsilon: 0.01,
        };
        let json = settings.to_json().unwrap();
        assert_eq!(RoundSettings::from_json(&json).unwrap(), settings);
    }
}
