//! Per-process debug log files
//!
//! Events are buffered in memory until [`LogFileManager::load`] names a
//! destination, then written synchronously to `<prefix>debug-<n>.log`,
//! rotating every `max_logs_per_file` events. Once `max_files_per_process`
//! files have been filled the manager turns itself off for good.

use debuglog_core::constants::is_flow_control_level;
use debuglog_core::{Error, LogEvent, LogListener, Result};
use parking_lot::RwLock;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::cleanup::Cleanup;
use crate::format::format_log_item;
use crate::naming::{log_file_path, pad_index};
use crate::rotation::RotationConfig;

/// Where formatted events currently go
enum Sink {
    /// No destination yet; keep everything in memory
    Buffer(Vec<String>),
    /// Blocking handle to the current log file
    File(BufWriter<File>),
    /// Log files were disabled by the caller
    Discard,
}

/// Destination for [`LogFileManager::load`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Prefix the file names are appended to, e.g. `/home/me/.npm/_logs/2024-..Z-`.
    /// Its directory must already exist.
    pub path: PathBuf,
    /// Historical files to keep. `None` is unbounded, `Some(0)` disables log files.
    pub logs_max: Option<i64>,
}

impl LoadOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            logs_max: None,
        }
    }

    pub fn with_logs_max(mut self, logs_max: i64) -> Self {
        self.logs_max = Some(logs_max);
        self
    }
}

/// Writes log events to rotating debug log files
pub struct LogFileManager {
    config: RotationConfig,
    /// `None` once the manager has been turned off
    sink: Option<Sink>,
    file_log_count: usize,
    total_log_count: u64,
    path: Option<PathBuf>,
    logs_max: Option<i64>,
    /// Shared with cleanup so it never removes a file this process owns
    files: Arc<RwLock<Vec<PathBuf>>>,
}

impl Default for LogFileManager {
    fn default() -> Self {
        Self::new(RotationConfig::default())
    }
}

impl LogFileManager {
    /// Create a manager that is already on and buffering
    pub fn new(config: RotationConfig) -> Self {
        Self {
            config,
            sink: Some(Sink::Buffer(Vec::new())),
            file_log_count: 0,
            total_log_count: 0,
            path: None,
            logs_max: None,
            files: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Start accepting events again with a fresh in-memory buffer
    pub fn on(&mut self) {
        self.end_stream(None);
        self.sink = Some(Sink::Buffer(Vec::new()));
    }

    /// Close the current file, if any, and drop every later event
    pub fn off(&mut self) {
        self.end_stream(None);
    }

    /// Bind to a destination and start cleaning up old files.
    ///
    /// Buffered events are flushed into the first file. If that file cannot be
    /// created the manager keeps buffering; if this process already created
    /// `max_files_per_process` files it turns off instead. With `logs_max <= 0`
    /// no file is created and events are discarded. Cleanup runs regardless; the returned
    /// handle may be awaited but never reports failure.
    pub fn load(&mut self, options: LoadOptions) -> Cleanup {
        if self.sink.is_none() {
            return Cleanup::finished();
        }

        self.path = Some(options.path);
        self.logs_max = options.logs_max;

        trace!(
            "logfile logs-max:{} dir:{}",
            self.logs_max.map_or_else(|| "Infinity".to_string(), |m| m.to_string()),
            self.path.as_ref().map(|p| p.display().to_string()).unwrap_or_default()
        );

        if self.logs_max.map_or(true, |max| max > 0) {
            if matches!(self.sink, Some(Sink::Buffer(_))) {
                match self.open_log_file() {
                    Ok(file) => self.flush_buffer_into(file),
                    Err(e @ Error::FileLimitReached(_)) => {
                        debug!("logfile {}", e);
                        self.off();
                    }
                    // A read-only log dir should not warn on every run
                    Err(e) => debug!("logfile {}", e),
                }
            }
        } else {
            self.sink = Some(Sink::Discard);
        }

        let prefix = self.path.clone().unwrap_or_default();
        Cleanup::spawn(prefix, self.logs_max, Arc::clone(&self.files))
    }

    /// Record one event. Never fails; problems are reported through `tracing`.
    pub fn log(&mut self, level: &str, title: &str, args: &[Value]) {
        if is_flow_control_level(level) || self.sink.is_none() {
            return;
        }

        let seq = self.total_log_count;
        self.total_log_count += 1;
        self.file_log_count += 1;

        let output = match self.sink {
            Some(Sink::Discard) | None => return,
            _ => format_log_item(seq, level, title, args),
        };

        if let Some(Sink::Buffer(buffer)) = self.sink.as_mut() {
            buffer.push(output);
        } else {
            self.write_to_file(&output);
        }
    }

    /// Paths of every file this process created, oldest first
    pub fn files(&self) -> Vec<PathBuf> {
        self.files.read().clone()
    }

    pub fn is_on(&self) -> bool {
        self.sink.is_some()
    }

    /// Whether events are still held in memory waiting for [`Self::load`]
    pub fn is_buffered(&self) -> bool {
        matches!(self.sink, Some(Sink::Buffer(_)))
    }

    pub fn config(&self) -> &RotationConfig {
        &self.config
    }

    fn write_to_file(&mut self, output: &str) {
        if self.file_log_count < self.config.max_logs_per_file {
            if let Some(Sink::File(writer)) = self.sink.as_mut() {
                if let Err(e) = write_chunk(writer, output) {
                    debug!("logfile write failed: {}", e);
                }
            }
            return;
        }

        // The event that reaches the cap is the last one in this file
        self.end_stream(Some(output));

        if self.files.read().len() >= self.config.max_files_per_process {
            self.off();
            return;
        }

        match self.open_log_file() {
            Ok(file) => self.sink = Some(Sink::File(file)),
            Err(e) => {
                debug!("logfile {}", e);
                self.off();
            }
        }
    }

    fn flush_buffer_into(&mut self, mut file: BufWriter<File>) {
        if let Some(Sink::Buffer(buffer)) = self.sink.take() {
            for chunk in &buffer {
                if let Err(e) = write_chunk(&mut file, chunk) {
                    debug!("logfile write failed: {}", e);
                    break;
                }
            }
        }
        self.sink = Some(Sink::File(file));
    }

    fn open_log_file(&mut self) -> Result<BufWriter<File>> {
        let prefix = self.path.as_ref().ok_or(Error::NotLoaded)?;
        let count = self.files.read().len();
        if count >= self.config.max_files_per_process {
            return Err(Error::FileLimitReached(self.config.max_files_per_process));
        }
        let path = log_file_path(prefix, &pad_index(count, self.config.max_files_per_process));

        // Registered before the file exists so cleanup can never pick it up
        self.files.write().push(path.clone());

        let file = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => file,
            Err(e) => {
                self.files.write().pop();
                return Err(Error::log_file_create(path, e));
            }
        };

        // Events buffered before load count toward the first file
        if count > 0 {
            self.file_log_count = 0;
        }

        trace!("logfile {}", path.display());
        Ok(BufWriter::new(file))
    }

    /// Drop the current sink, writing `last` first if it is a file
    fn end_stream(&mut self, last: Option<&str>) {
        if let Some(Sink::File(mut writer)) = self.sink.take() {
            let result = match last {
                Some(output) => write_chunk(&mut writer, output),
                None => writer.flush(),
            };
            if let Err(e) = result {
                debug!("logfile write failed: {}", e);
            }
        }
    }
}

impl LogListener for LogFileManager {
    fn handle_event(&mut self, event: &LogEvent) {
        if event.is_flow_control() {
            return;
        }
        self.log(&event.level, &event.title, &event.args);
    }
}

impl Drop for LogFileManager {
    fn drop(&mut self) {
        self.end_stream(None);
    }
}

/// Write and flush so the bytes are on disk before `log` returns
fn write_chunk(writer: &mut BufWriter<File>, chunk: &str) -> std::io::Result<()> {
    writer.write_all(chunk.as_bytes())?;
    writer.flush()
}
