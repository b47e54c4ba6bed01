//! Error types for debuglog

use std::path::PathBuf;

/// debuglog error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Log file could not be created: {path}: {source}")]
    LogFileCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Log directory not set")]
    NotLoaded,

    #[error("Per-process log file limit of {0} reached")]
    FileLimitReached(usize),

    #[error("Invalid glob pattern: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Glob error: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Result type alias for debuglog
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::ConfigError(msg.into())
    }

    pub fn log_file_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::LogFileCreate {
            path: path.into(),
            source,
        }
    }
}
