//! Log file names and the glob used to find them again

use chrono::{DateTime, SecondsFormat, Utc};
use debuglog_core::constants::{LOG_FILE_EXT, LOG_FILE_STEM};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Zero-pad `index` to the digit count of `max_files_per_process`, so that
/// lexicographic and numeric order agree (`-05.log` sorts before `-15.log`).
pub fn pad_index(index: usize, max_files_per_process: usize) -> String {
    let width = max_files_per_process.to_string().len();
    format!("{:0width$}", index, width = width)
}

/// `<prefix>debug-<index>.log`. The prefix is concatenated, not joined.
pub fn log_file_path(prefix: &Path, index: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(format!("{}{}{}", LOG_FILE_STEM, index, LOG_FILE_EXT));
    PathBuf::from(name)
}

/// Prefix for one run: `<dir>/<utc timestamp>-`, with `.` and `:` made
/// filesystem friendly (`2024-05-01T10_20_30_123Z-`).
pub fn timestamped_prefix(dir: &Path, now: DateTime<Utc>) -> PathBuf {
    let stamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(['.', ':'], "_");
    dir.join(format!("{}-", stamp))
}

/// Glob matching every debug log a prefix of this shape could have produced.
///
/// Digits in the file name become `[0-9]` so files from earlier runs (other
/// timestamps) match too. The numbered suffix is a wildcard, which also covers
/// the single-file `debug.log` layout that predates rotation.
pub fn cleanup_pattern(prefix: &Path) -> String {
    let legacy = log_file_path(prefix, "");
    let dir = legacy.parent().unwrap_or_else(|| Path::new(""));
    let base = legacy
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let stem = base
        .strip_suffix(&format!("-{}", LOG_FILE_EXT))
        .unwrap_or(&base);

    let mut pattern = String::with_capacity(stem.len() * 2);
    for c in stem.chars() {
        if c.is_ascii_digit() {
            pattern.push_str("[0-9]");
        } else {
            pattern.push_str(&glob::Pattern::escape(c.encode_utf8(&mut [0; 4])));
        }
    }
    pattern.push('*');
    pattern.push_str(LOG_FILE_EXT);

    if dir.as_os_str().is_empty() {
        pattern
    } else {
        let dir = glob::Pattern::escape(&dir.to_string_lossy());
        format!("{}{}{}", dir, std::path::MAIN_SEPARATOR, pattern)
    }
}
