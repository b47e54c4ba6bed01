//! Constants and default values for debuglog

use std::path::PathBuf;

/// Default debuglog home directory name
pub const DEBUGLOG_DIR: &str = ".debuglog";

/// Directory under the home directory that holds debug log files
pub const LOGS_DIR: &str = "_logs";

/// Default config file names to search for (in priority order)
pub const CONFIG_FILES: &[&str] = &[
    "debuglog.toml",
    "debuglog.yaml",
    "debuglog.yml",
    "debuglog.json",
];

/// Default number of events written to one file before rotating
pub const DEFAULT_MAX_LOGS_PER_FILE: usize = 50_000;

/// Default number of files a single process may create
pub const DEFAULT_MAX_FILES_PER_PROCESS: usize = 5;

/// Stem appended to the configured prefix for every log file
pub const LOG_FILE_STEM: &str = "debug-";

/// Extension of every log file
pub const LOG_FILE_EXT: &str = ".log";

/// Levels that control output flow for other consumers and are never persisted
pub const FLOW_CONTROL_LEVELS: &[&str] = &["pause", "resume"];

/// Whether `level` is a flow-control marker rather than content
pub fn is_flow_control_level(level: &str) -> bool {
    FLOW_CONTROL_LEVELS.contains(&level)
}

/// Platform line terminator appended to every written line
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";

/// Platform line terminator appended to every written line
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Get the debuglog home directory
pub fn debuglog_home() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(DEBUGLOG_DIR))
        .unwrap_or_else(|| PathBuf::from(DEBUGLOG_DIR))
}

/// Get the default logs directory
pub fn logs_dir() -> PathBuf {
    debuglog_home().join(LOGS_DIR)
}
