//! Terminal output formatting

use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag for JSON output mode
static JSON_MODE: AtomicBool = AtomicBool::new(false);

/// Enable or disable JSON output mode
pub fn set_json_mode(enabled: bool) {
    JSON_MODE.store(enabled, Ordering::SeqCst);
}

/// Check if JSON output mode is enabled
pub fn is_json_mode() -> bool {
    JSON_MODE.load(Ordering::SeqCst)
}

#[derive(Serialize)]
struct FilesJson<'a> {
    files: &'a [PathBuf],
}

pub fn print_success(message: &str) {
    if !is_json_mode() {
        println!("{} {}", "✓".green(), message);
    }
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print file paths, one per line or as `{"files": [...]}`
pub fn print_files(files: &[PathBuf]) {
    if is_json_mode() {
        match serde_json::to_string_pretty(&FilesJson { files }) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing to JSON: {}", e),
        }
        return;
    }

    for file in files {
        println!("{}", file.display());
    }
}

/// Tell the user where this run's log ended up
pub fn print_log_report(files: &[PathBuf]) {
    if is_json_mode() {
        print_files(files);
        return;
    }

    for file in files {
        eprintln!(
            "{} A complete log of this run can be found in: {}",
            "ℹ".blue(),
            file.display()
        );
    }
}
