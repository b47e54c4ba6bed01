//! Command implementations

pub mod clean;
pub mod list;
pub mod record;

use anyhow::{Context, Result};
use chrono::Utc;
use debuglog_core::LogFileSettings;
use debuglog_files::timestamped_prefix;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings from the config file, then `--dir`, then per-command overrides
pub fn resolve_settings(
    config: Option<&Path>,
    dir: Option<PathBuf>,
    overrides: LogFileSettings,
) -> Result<LogFileSettings> {
    let from_file = match config {
        Some(path) => LogFileSettings::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            match LogFileSettings::find_and_load(&cwd)? {
                Some((settings, path)) => {
                    debug!("Using config {}", path.display());
                    settings
                }
                None => LogFileSettings::default(),
            }
        }
    };

    let settings = from_file
        .merge(LogFileSettings {
            logs_dir: dir,
            ..Default::default()
        })
        .merge(overrides);
    settings.validate()?;
    Ok(settings)
}

/// A prefix shaped like the ones `record` uses, for matching existing files
pub fn current_prefix(settings: &LogFileSettings) -> PathBuf {
    timestamped_prefix(&settings.logs_dir_or_default(), Utc::now())
}
