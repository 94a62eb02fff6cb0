use crate::error::{LogError, Result};
use crate::logs::{validate_pattern, Level, RotationPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Logger configuration: where the two rotating files live, how they
/// rotate, and how the console sink behaves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Directory holding both rotating files
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Base name of the file receiving records below Warn
    #[serde(default = "default_info_file")]
    pub info_file: String,

    /// Base name of the file receiving Warn and above
    #[serde(default = "default_warn_file")]
    pub warn_file: String,

    /// strftime suffix appended to each base name
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,

    /// Seconds between rotations
    #[serde(default = "default_rotation_interval")]
    pub rotation_interval_secs: u64,

    /// Maximum age of rotated files, in seconds
    #[serde(default = "default_retention")]
    pub retention_secs: u64,

    /// Whether to write to stdout at all
    #[serde(default = "default_true")]
    pub console: bool,

    #[serde(default = "default_true")]
    pub console_color: bool,

    /// Initial minimum level, adjustable at runtime
    #[serde(default = "default_level")]
    pub level: Level,

    /// Escalate DPanic records into panic signals
    #[serde(default)]
    pub development: bool,
}

// Default value functions for serde
fn default_log_dir() -> PathBuf {
    PathBuf::from("./log")
}

fn default_info_file() -> String {
    "demo".to_string()
}

fn default_warn_file() -> String {
    "demo_error".to_string()
}

fn default_file_pattern() -> String {
    crate::logs::DEFAULT_FILE_PATTERN.to_string()
}

fn default_rotation_interval() -> u64 {
    crate::logs::DEFAULT_ROTATION_INTERVAL.as_secs()
}

fn default_retention() -> u64 {
    crate::logs::DEFAULT_RETENTION.as_secs()
}

fn default_true() -> bool {
    true
}

fn default_level() -> Level {
    Level::Debug
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            info_file: default_info_file(),
            warn_file: default_warn_file(),
            file_pattern: default_file_pattern(),
            rotation_interval_secs: default_rotation_interval(),
            retention_secs: default_retention(),
            console: true,
            console_color: true,
            level: default_level(),
            development: false,
        }
    }
}

impl LogConfig {
    /// Load a configuration file (supports TOML and JSON)
    pub fn from_file(path: &Path) -> Result<LogConfig> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| LogError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        let config = match extension {
            "toml" => Self::parse_toml(&contents)?,
            "json" => Self::parse_json(&contents)?,
            _ => {
                return Err(LogError::InvalidConfig(format!(
                    "Unsupported file format: {}. Use .toml or .json",
                    extension
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse TOML configuration; settings may sit at the top level or under `[logging]`
    pub fn parse_toml(contents: &str) -> Result<LogConfig> {
        #[derive(Deserialize)]
        struct ConfigFile {
            logging: Option<LogConfig>,
            #[serde(flatten)]
            top: LogConfig,
        }

        let file: ConfigFile = toml::from_str(contents)
            .map_err(|e| LogError::InvalidConfig(format!("Failed to parse TOML: {}", e)))?;

        Ok(file.logging.unwrap_or(file.top))
    }

    pub fn parse_json(contents: &str) -> Result<LogConfig> {
        serde_json::from_str(contents)
            .map_err(|e| LogError::InvalidConfig(format!("Failed to parse JSON: {}", e)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.info_file.is_empty() {
            return Err(LogError::ConfigValidationError(
                "info_file must not be empty".to_string(),
            ));
        }

        if self.warn_file.is_empty() {
            return Err(LogError::ConfigValidationError(
                "warn_file must not be empty".to_string(),
            ));
        }

        if self.info_file == self.warn_file {
            return Err(LogError::ConfigValidationError(
                "info_file and warn_file must differ".to_string(),
            ));
        }

        validate_pattern(&self.file_pattern)?;

        if self.rotation_interval_secs == 0 {
            return Err(LogError::ConfigValidationError(
                "rotation_interval_secs must be at least 1".to_string(),
            ));
        }

        if i64::try_from(self.rotation_interval_secs).is_err() {
            return Err(LogError::ConfigValidationError(format!(
                "rotation_interval_secs must be at most {}",
                i64::MAX
            )));
        }

        if self.retention_secs == 0 {
            return Err(LogError::ConfigValidationError(
                "retention_secs must be at least 1".to_string(),
            ));
        }

        if self.retention_secs < self.rotation_interval_secs {
            return Err(LogError::ConfigValidationError(format!(
                "retention_secs ({}) cannot be shorter than rotation_interval_secs ({})",
                self.retention_secs, self.rotation_interval_secs
            )));
        }

        Ok(())
    }

    pub fn rotation_policy(&self) -> RotationPolicy {
        RotationPolicy {
            pattern: self.file_pattern.clone(),
            rotation_interval: Duration::from_secs(self.rotation_interval_secs),
            retention: Duration::from_secs(self.retention_secs),
        }
    }
}
