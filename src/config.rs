//! Runtime settings
//!
//! Settings come from an optional JSON file; any field left out keeps
//! its default. The binary applies command-line overrides on top.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{StockError, Result};
use crate::utils::CodeFormat;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Pattern for generated product codes, e.g. `EUK111111`
    pub code_format: String,
    /// Seconds between monitor ticks
    pub poll_interval_secs: u64,
    /// Milliseconds a store call may wait on a locked database
    pub busy_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(crate::DATABASE_FILENAME),
            code_format: crate::DEFAULT_CODE_FORMAT.to_string(),
            poll_interval_secs: crate::DEFAULT_POLL_INTERVAL_SECS,
            busy_timeout_ms: crate::DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            StockError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let settings: Settings = serde_json::from_str(&raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the monitor or store cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            return Err(StockError::ConfigError("poll_interval_secs must be at least 1".to_string()));
        }
        if self.busy_timeout_ms == 0 {
            return Err(StockError::ConfigError("busy_timeout_ms must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    pub fn code_format(&self) -> CodeFormat {
        CodeFormat::parse(&self.code_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.database_path, PathBuf::from("inventory.db"));
        assert_eq!(settings.code_format(), CodeFormat::new("EUK", 6));
        assert_eq!(settings.poll_interval(), Duration::from_secs(1));
        settings.validate().unwrap();
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stockwatch.json");
        fs::write(&path, r#"{ "code_format": "SKU1111", "poll_interval_secs": 2 }"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.code_format(), CodeFormat::new("SKU", 4));
        assert_eq!(settings.poll_interval(), Duration::from_secs(2));
        assert_eq!(settings.busy_timeout_ms, 5000);
    }

    #[test]
    fn test_load_rejects_zero_interval() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stockwatch.json");
        fs::write(&path, r#"{ "poll_interval_secs": 0 }"#).unwrap();

        assert!(matches!(Settings::load(&path), Err(StockError::ConfigError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Settings::load(Path::new("/nonexistent/stockwatch.json"));
        assert!(matches!(result, Err(StockError::ConfigError(_))));
    }

    #[test]
    fn test_load_bad_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stockwatch.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Settings::load(&path), Err(StockError::ConfigError(_))));
    }
}
