//! Bridge configuration
//!
//! Loaded from JSON; every key is optional and falls back to its default.
//!
//! ```json
//! {
//!   "field_max_len": 16777216,
//!   "scratch_step": 1024,
//!   "time_zone": "local",
//!   "datetime_encoding": "timestamp",
//!   "log_level": "WARN"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{Logger, Severity};

/// Ceiling for variable-length field values (16 MiB, exclusive)
pub const DEFAULT_FIELD_MAX_LEN: usize = 16 * 1024 * 1024;

/// Scratch buffer growth step
pub const DEFAULT_SCRATCH_STEP: usize = 1024;

const SECONDS_PER_DAY: i32 = 86_400;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Zone used for wall-clock <-> epoch conversion of DATE and DATETIME
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeZoneSetting {
    /// The process's local zone
    #[default]
    Local,
    Utc,
    /// Fixed offset east of UTC
    OffsetSeconds(i32),
}

/// Document form of DATETIME columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DateTimeEncoding {
    /// Timestamp with zero fractional part
    #[default]
    Timestamp,
    /// Legacy packed 64-bit form: 32-bit seconds + 32-bit micros
    LegacyPacked,
}

/// Bridge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Variable-length values at or above this many bytes are rejected
    #[serde(default = "default_field_max_len")]
    pub field_max_len: usize,

    /// Scratch buffer growth step in bytes
    #[serde(default = "default_scratch_step")]
    pub scratch_step: usize,

    #[serde(default)]
    pub time_zone: TimeZoneSetting,

    #[serde(default)]
    pub datetime_encoding: DateTimeEncoding,

    /// Minimum severity written by the logger
    #[serde(default = "default_log_level")]
    pub log_level: Severity,
}

fn default_field_max_len() -> usize {
    DEFAULT_FIELD_MAX_LEN
}

fn default_scratch_step() -> usize {
    DEFAULT_SCRATCH_STEP
}

fn default_log_level() -> Severity {
    Severity::Warn
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            field_max_len: default_field_max_len(),
            scratch_step: default_scratch_step(),
            time_zone: TimeZoneSetting::default(),
            datetime_encoding: DateTimeEncoding::default(),
            log_level: default_log_level(),
        }
    }
}

impl BridgeConfig {
    /// Default configuration converting times in UTC
    pub fn utc() -> Self {
        Self {
            time_zone: TimeZoneSetting::Utc,
            ..Self::default()
        }
    }

    /// Parses and validates a JSON configuration
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: BridgeConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.field_max_len == 0 {
            return Err(ConfigError::Invalid("field_max_len must be > 0".into()));
        }
        if self.scratch_step == 0 {
            return Err(ConfigError::Invalid("scratch_step must be > 0".into()));
        }
        if let TimeZoneSetting::OffsetSeconds(offset) = self.time_zone {
            if offset.abs() >= SECONDS_PER_DAY {
                return Err(ConfigError::Invalid(format!(
                    "time zone offset {} outside +/-24h",
                    offset
                )));
            }
        }
        Ok(())
    }

    /// Installs `log_level` as the process-wide logger threshold
    pub fn apply_log_level(&self) {
        Logger::set_min_severity(self.log_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.field_max_len, 16 * 1024 * 1024);
        assert_eq!(config.scratch_step, 1024);
        assert_eq!(config.time_zone, TimeZoneSetting::Local);
        assert_eq!(config.datetime_encoding, DateTimeEncoding::Timestamp);
        assert_eq!(config.log_level, Severity::Warn);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = BridgeConfig::from_json_str("{}").unwrap();
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn test_parse_all_keys() {
        let config = BridgeConfig::from_json_str(
            r#"{
                "field_max_len": 4096,
                "scratch_step": 256,
                "time_zone": {"offset_seconds": -18000},
                "datetime_encoding": "legacy_packed",
                "log_level": "TRACE"
            }"#,
        )
        .unwrap();
        assert_eq!(config.field_max_len, 4096);
        assert_eq!(config.scratch_step, 256);
        assert_eq!(config.time_zone, TimeZoneSetting::OffsetSeconds(-18000));
        assert_eq!(config.datetime_encoding, DateTimeEncoding::LegacyPacked);
        assert_eq!(config.log_level, Severity::Trace);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            BridgeConfig::from_json_str(r#"{"scratch_step": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            BridgeConfig::from_json_str(r#"{"time_zone": {"offset_seconds": 90000}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            BridgeConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), r#"{"time_zone": "utc"}"#).unwrap();
        let config = BridgeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.time_zone, TimeZoneSetting::Utc);

        let missing = BridgeConfig::from_file(Path::new("/nonexistent/bridge.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_apply_log_level() {
        let config = BridgeConfig::from_json_str(r#"{"log_level": "ERROR"}"#).unwrap();
        config.apply_log_level();
        assert_eq!(Logger::min_severity(), Severity::Error);
        assert!(!Logger::is_enabled(Severity::Warn));

        BridgeConfig::default().apply_log_level();
        assert!(Logger::is_enabled(Severity::Warn));
    }
}
