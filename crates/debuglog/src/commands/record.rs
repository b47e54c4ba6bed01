//! Record command implementation - stdin lines become log events

use anyhow::Result;
use chrono::Utc;
use debuglog_core::{LogBus, LogFileSettings};
use debuglog_files::{timestamped_prefix, LoadOptions, LogFileManager, RotationConfig};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::cli::RecordArgs;
use crate::output::print_log_report;

pub async fn execute(args: RecordArgs, settings: LogFileSettings) -> Result<()> {
    let bus = LogBus::new();
    let manager = Arc::new(Mutex::new(LogFileManager::new(RotationConfig::from(&settings))));
    let listener = bus.subscribe(Arc::clone(&manager));

    // Everything up to load is held in memory
    let argv: Vec<String> = std::env::args().collect();
    bus.emit("verbose", "cli", vec![json!(argv.join(" "))]);

    let dir = settings.logs_dir_or_default();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        warn!("Could not create log directory {}: {}", dir.display(), e);
    }

    let mut options = LoadOptions::new(timestamped_prefix(&dir, Utc::now()));
    options.logs_max = settings.logs_max;
    let cleanup = manager.lock().load(options);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        bus.emit(&args.level, &args.title, vec![json!(line)]);
    }

    bus.emit("verbose", "exit", vec![json!(0)]);
    bus.unsubscribe(listener);
    manager.lock().off();
    cleanup.wait().await;

    let files = manager.lock().files();
    print_log_report(&files);
    Ok(())
}
