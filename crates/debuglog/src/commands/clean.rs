//! Clean command implementation - removes the oldest log files

use anyhow::{bail, Result};
use debuglog_core::LogFileSettings;
use debuglog_files::{clean_logs, find_log_files};

use crate::cli::CleanArgs;
use crate::output::print_success;

pub async fn execute(args: CleanArgs, settings: LogFileSettings) -> Result<()> {
    let Some(logs_max) = args.logs_max.or(settings.logs_max) else {
        bail!("No retention limit: pass --logs-max or set logs-max in the config file");
    };

    let prefix = super::current_prefix(&settings);
    let before = find_log_files(&prefix, &[])?.len();
    clean_logs(prefix.clone(), Some(logs_max), Vec::new()).await;
    let after = find_log_files(&prefix, &[])?.len();

    print_success(&format!(
        "Removed {} log file(s), {} remaining",
        before.saturating_sub(after),
        after
    ));
    Ok(())
}
