//! Logger configuration types, deserialised from the `[logger]` section.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::logger::LoggerError;

/// Valid log levels accepted by [`LoggerConfig::level`]
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

fn default_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> PathBuf {
    PathBuf::from("logs/astro.log")
}

fn default_max_size() -> u64 {
    10 * 1024 * 1024
}

fn default_max_files() -> usize {
    5
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Either a bare level (`info`) or a full `EnvFilter` directive
    /// (`astro_rs=debug,tower_http=warn`).
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleConfig,

    #[serde(default)]
    pub file: FileConfig,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            console: ConsoleConfig::default(),
            file: FileConfig::default(),
        }
    }
}

impl LoggerConfig {
    pub fn validate(&self) -> Result<(), LoggerError> {
        validate_level(&self.level)?;

        if !self.console.enabled && !self.file.enabled {
            return Err(LoggerError::config(
                "At least one output (console or file) must be enabled",
            ));
        }

        self.file.validate()
    }
}

/// Accepts a bare level or a directive list whose every level is known.
pub fn validate_level(level: &str) -> Result<(), LoggerError> {
    let trimmed = level.trim();
    if trimmed.is_empty() {
        return Err(LoggerError::config("Log level cannot be empty"));
    }

    for directive in trimmed.split(',') {
        let lvl = directive
            .rsplit_once('=')
            .map(|(_, lvl)| lvl)
            .unwrap_or(directive)
            .trim()
            .to_lowercase();
        if !VALID_LOG_LEVELS.contains(&lvl.as_str()) {
            return Err(LoggerError::config(format!(
                "Invalid log level '{}'. Valid levels are: {}",
                lvl,
                VALID_LOG_LEVELS.join(", ")
            )));
        }
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// ANSI colours; only honoured when stdout is a terminal
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            colored: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: PathBuf,

    #[serde(default = "default_true")]
    pub append: bool,

    #[serde(default)]
    pub format: LogFormat,

    /// Size in bytes at which the active file is rotated
    #[serde(default = "default_max_size")]
    pub max_size: u64,

    /// Rotated files kept next to the active one (`astro.log.1` ..)
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: true,
            format: LogFormat::default(),
            max_size: default_max_size(),
            max_files: default_max_files(),
        }
    }
}

impl FileConfig {
    pub fn validate(&self) -> Result<(), LoggerError> {
        if !self.enabled {
            return Ok(());
        }
        if self.path.as_os_str().is_empty() {
            return Err(LoggerError::config(
                "File path is required when file logging is enabled",
            ));
        }
        if self.max_size == 0 {
            return Err(LoggerError::config("max_size must be greater than 0"));
        }
        if self.max_files == 0 {
            return Err(LoggerError::config("max_files must be greater than 0"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Full,
    Compact,
    #[default]
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(LoggerError::format(format!(
                "Invalid log format '{s}'. Valid formats are: full, compact, json"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(LoggerConfig::default().validate().is_ok());
    }

    #[test]
    fn directive_lists_are_accepted() {
        assert!(validate_level("astro_rs=debug,tower_http=warn").is_ok());
        assert!(validate_level("INFO").is_ok());
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert!(validate_level("verbose").is_err());
        assert!(validate_level("astro_rs=loud").is_err());
        assert!(validate_level("  ").is_err());
    }

    #[test]
    fn both_outputs_disabled_is_rejected() {
        let config = LoggerConfig {
            console: ConsoleConfig {
                enabled: false,
                colored: false,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn enabled_file_needs_path_and_limits() {
        let mut file = FileConfig {
            enabled: true,
            path: PathBuf::new(),
            ..Default::default()
        };
        assert!(file.validate().is_err());

        file.path = PathBuf::from("logs/x.log");
        file.max_files = 0;
        assert!(file.validate().is_err());

        file.max_files = 3;
        assert!(file.validate().is_ok());
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
