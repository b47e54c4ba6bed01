//! Log rotation configuration

use debuglog_core::{constants, LogFileSettings};

/// Limits that drive rotation inside a single process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationConfig {
    /// Events written to one file before moving on to the next
    pub max_logs_per_file: usize,
    /// Files one process may create before it stops writing altogether
    pub max_files_per_process: usize,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            max_logs_per_file: constants::DEFAULT_MAX_LOGS_PER_FILE,
            max_files_per_process: constants::DEFAULT_MAX_FILES_PER_PROCESS,
        }
    }
}

impl RotationConfig {
    pub fn new(max_logs_per_file: usize, max_files_per_process: usize) -> Self {
        Self {
            max_logs_per_file: max_logs_per_file.max(1),
            max_files_per_process: max_files_per_process.max(1),
        }
    }
}

impl From<&LogFileSettings> for RotationConfig {
    fn from(settings: &LogFileSettings) -> Self {
        Self::new(
            settings.max_logs_per_file_or_default(),
            settings.max_files_per_process_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RotationConfig::default();
        assert_eq!(config.max_logs_per_file, 50_000);
        assert_eq!(config.max_files_per_process, 5);
    }

    #[test]
    fn test_zero_limits_are_clamped() {
        let config = RotationConfig::new(0, 0);
        assert_eq!(config, RotationConfig::new(1, 1));
    }

    #[test]
    fn test_from_settings() {
        let settings = LogFileSettings {
            max_files_per_process: Some(20),
            ..Default::default()
        };
        let config = RotationConfig::from(&settings);
        assert_eq!(config.max_files_per_process, 20);
        assert_eq!(config.max_logs_per_file, 50_000);
    }
}
