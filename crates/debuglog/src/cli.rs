//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use debuglog_core::LogFileSettings;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "debuglog")]
#[command(version, about = "Per-process rotating debug log files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (debuglog.toml/.yaml/.json); defaults to one in the current directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the debug log files
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log every stdin line as one event
    Record(RecordArgs),

    /// List debug log files, oldest first
    List,

    /// Remove old debug log files
    Clean(CleanArgs),
}

#[derive(Args)]
pub struct RecordArgs {
    /// Level given to every event
    #[arg(long, default_value = "info")]
    pub level: String,

    /// Title given to every event
    #[arg(long, default_value = "")]
    pub title: String,

    /// Historical log files to keep (0 disables log files)
    #[arg(long, allow_negative_numbers = true)]
    pub logs_max: Option<i64>,

    /// Events per file before rotating
    #[arg(long)]
    pub max_logs_per_file: Option<usize>,

    /// Files this run may create
    #[arg(long)]
    pub max_files_per_process: Option<usize>,
}

#[derive(Args)]
pub struct CleanArgs {
    /// Log files to keep
    #[arg(long, allow_negative_numbers = true)]
    pub logs_max: Option<i64>,
}

impl RecordArgs {
    pub fn overrides(&self) -> LogFileSettings {
        LogFileSettings {
            logs_dir: None,
            logs_max: self.logs_max,
            max_logs_per_file: self.max_logs_per_file,
            max_files_per_process: self.max_files_per_process,
        }
    }
}
