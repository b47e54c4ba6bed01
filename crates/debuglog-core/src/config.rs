//! Configuration file parsing for debuglog
//!
//! Supports multiple configuration file formats:
//! - TOML (.toml)
//! - YAML (.yaml, .yml)
//! - JSON (.json)
//!
//! Keys use npm's spelling (`logs-dir`, `logs-max`, ...). Every key is
//! optional; missing keys fall back to the defaults in [`crate::constants`].

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::error::{Error, Result};

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    /// Detect format from file path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Log file settings as read from a config file
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct LogFileSettings {
    /// Directory that receives the debug log files
    pub logs_dir: Option<PathBuf>,
    /// Number of historical log files to retain. Absent means unbounded,
    /// zero disables log files, negative removes everything not in use.
    pub logs_max: Option<i64>,
    /// Events written to one file before rotating
    pub max_logs_per_file: Option<usize>,
    /// Files a single process may create
    pub max_files_per_process: Option<usize>,
}

impl LogFileSettings {
    /// Load settings from file, automatically detecting format from extension
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            Error::ConfigError(format!(
                "Unsupported config file extension: {}. Expected .toml, .yaml, .yml, or .json",
                path.display()
            ))
        })?;

        let content = std::fs::read_to_string(path)?;
        let settings = Self::parse(&content, format)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings content with specified format
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let settings = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Ok(settings)
    }

    /// Find and load the first known config file in `dir`, if any
    pub fn find_and_load(dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        for name in CONFIG_FILES {
            let path = dir.join(name);
            if path.exists() {
                let settings = Self::load(&path)?;
                return Ok(Some((settings, path)));
            }
        }
        Ok(None)
    }

    /// Reject values that would make the manager unusable
    pub fn validate(&self) -> Result<()> {
        if self.max_logs_per_file == Some(0) {
            return Err(Error::config("max-logs-per-file must be greater than zero"));
        }
        if self.max_files_per_process == Some(0) {
            return Err(Error::config(
                "max-files-per-process must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Overlay `other` on top of `self`, keeping `self` where `other` is unset
    pub fn merge(self, other: LogFileSettings) -> Self {
        Self {
            logs_dir: other.logs_dir.or(self.logs_dir),
            logs_max: other.logs_max.or(self.logs_max),
            max_logs_per_file: other.max_logs_per_file.or(self.max_logs_per_file),
            max_files_per_process: other.max_files_per_process.or(self.max_files_per_process),
        }
    }

    pub fn logs_dir_or_default(&self) -> PathBuf {
        self.logs_dir.clone().unwrap_or_else(logs_dir)
    }

    pub fn max_logs_per_file_or_default(&self) -> usize {
        self.max_logs_per_file.unwrap_or(DEFAULT_MAX_LOGS_PER_FILE)
    }

    pub fn max_files_per_process_or_default(&self) -> usize {
        self.max_files_per_process
            .unwrap_or(DEFAULT_MAX_FILES_PER_PROCESS)
    }
}
