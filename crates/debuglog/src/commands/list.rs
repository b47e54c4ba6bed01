//! List command implementation

use anyhow::Result;
use debuglog_core::LogFileSettings;
use debuglog_files::find_log_files;

use crate::output::print_files;

pub fn execute(settings: LogFileSettings) -> Result<()> {
    let prefix = super::current_prefix(&settings);
    let files = find_log_files(&prefix, &[])?;
    print_files(&files);
    Ok(())
}
