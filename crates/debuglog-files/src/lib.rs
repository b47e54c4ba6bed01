//! debuglog files - Per-process debug log files: buffering, rotation and cleanup

mod cleanup;
mod format;
mod manager;
mod naming;
mod redact;
mod rotation;

pub use cleanup::{clean_logs, find_log_files, Cleanup};
pub use format::{format_log_item, format_message};
pub use manager::{LoadOptions, LogFileManager};
pub use naming::{cleanup_pattern, log_file_path, pad_index, timestamped_prefix};
pub use redact::sanitize;
pub use rotation::RotationConfig;
