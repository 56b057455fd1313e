//! Configuration management module.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::store::StartupPolicy;

/// Name of the snapshot file inside the data directory.
pub const DATA_FILE_NAME: &str = "attendance_data.json";

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub report: ReportConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

/// Snapshot file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_file: PathBuf,
    /// `load` keeps previous sessions, `clear` starts every run empty.
    pub startup: StartupPolicy,
}

/// Report window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Number of most recent dates in the rolling report (default: 30).
    pub rolling_days: usize,
    /// Number of days in the weekly grid (default: 7).
    pub weekly_days: u32,
}

/// Export destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub directory: PathBuf,
}

/// Log output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write daily-rolling log files here when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl AppConfig {
    /// Get config file path (platform config directory).
    pub fn default_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.data_file.as_os_str().is_empty() {
            return Err(ConfigError::Validation("Data file path cannot be empty".to_string()));
        }
        if self.report.rolling_days < 1 {
            return Err(ConfigError::Validation("Rolling days must be at least 1".to_string()));
        }
        if self.report.rolling_days > 366 {
            return Err(ConfigError::Validation("Rolling days cannot exceed 366".to_string()));
        }
        if self.report.weekly_days < 1 {
            return Err(ConfigError::Validation("Weekly days must be at least 1".to_string()));
        }
        if self.report.weekly_days > 31 {
            return Err(ConfigError::Validation("Weekly days cannot exceed 31".to_string()));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "class-attendance")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: project_dirs()
                .map(|dirs| dirs.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
                .join(DATA_FILE_NAME),
            startup: StartupPolicy::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            rolling_days: 30,
            weekly_days: 7,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.storage.startup, StartupPolicy::Load);
        assert!(config.storage.data_file.ends_with(DATA_FILE_NAME));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [storage]
            data_file = "class.json"
            startup = "clear"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.data_file, PathBuf::from("class.json"));
        assert_eq!(config.storage.startup, StartupPolicy::Clear);
        assert_eq!(config.report.rolling_days, 30);
        assert_eq!(config.report.weekly_days, 7);
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn test_validation_report_bounds() {
        let mut config = AppConfig::default();

        config.report.rolling_days = 0;
        assert!(config.validate().is_err());

        config.report.rolling_days = 367;
        assert!(config.validate().is_err());

        config.report.rolling_days = 30;
        config.report.weekly_days = 0;
        assert!(config.validate().is_err());

        config.report.weekly_days = 7;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_data_file() {
        let mut config = AppConfig::default();
        config.storage.data_file = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_try_load_results() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        assert!(matches!(AppConfig::try_load(&path), ConfigLoadResult::Missing));

        std::fs::write(&path, "[report]\nrolling_days = 0\n").unwrap();
        assert!(matches!(
            AppConfig::try_load(&path),
            ConfigLoadResult::Invalid(ConfigError::Validation(_))
        ));

        std::fs::write(&path, "[storage\n").unwrap();
        assert!(matches!(
            AppConfig::try_load(&path),
            ConfigLoadResult::Invalid(ConfigError::Parse(_))
        ));

        let mut config = AppConfig::default();
        config.storage.startup = StartupPolicy::Clear;
        config.save(&path).unwrap();
        match AppConfig::try_load(&path) {
            ConfigLoadResult::Loaded(loaded) => assert_eq!(loaded.storage.startup, StartupPolicy::Clear),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
