//! Best-effort removal of old debug log files
//!
//! Cleanup never fails from the caller's point of view: every problem is
//! reported through `tracing` and the task still completes.

use debuglog_core::Result;
use parking_lot::RwLock;
use std::fmt::Display;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::naming::cleanup_pattern;

enum Task {
    /// Spawned on the caller's tokio runtime
    Runtime(tokio::task::JoinHandle<()>),
    /// Caller had no runtime; runs on its own thread with a private one
    Thread(std::thread::JoinHandle<()>),
}

/// Handle to a cleanup run started by [`crate::LogFileManager::load`].
///
/// Awaiting it is optional; dropping it leaves the cleanup running.
pub struct Cleanup {
    task: Option<Task>,
}

impl std::fmt::Debug for Cleanup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cleanup")
            .field("finished", &self.is_finished())
            .finish()
    }
}

impl Cleanup {
    pub(crate) fn finished() -> Self {
        Self { task: None }
    }

    pub(crate) fn spawn(
        prefix: PathBuf,
        logs_max: Option<i64>,
        open_files: Arc<RwLock<Vec<PathBuf>>>,
    ) -> Self {
        let cleanup = clean_logs_guarded(prefix, logs_max, open_files);

        let task = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => Task::Runtime(runtime.spawn(cleanup)),
            Err(_) => {
                let spawned = std::thread::Builder::new()
                    .name("debuglog-cleanup".to_string())
                    .spawn(move || match current_thread_runtime() {
                        Ok(runtime) => runtime.block_on(cleanup),
                        Err(e) => debug!("logfile cleanup skipped: {}", e),
                    });
                match spawned {
                    Ok(handle) => Task::Thread(handle),
                    Err(e) => {
                        debug!("logfile cleanup skipped: {}", e);
                        return Self::finished();
                    }
                }
            }
        };

        Self { task: Some(task) }
    }

    /// Whether the cleanup has completed (or never started)
    pub fn is_finished(&self) -> bool {
        match &self.task {
            None => true,
            Some(Task::Runtime(handle)) => handle.is_finished(),
            Some(Task::Thread(handle)) => handle.is_finished(),
        }
    }

    /// Wait for the cleanup to finish
    pub async fn wait(self) {
        match self.task {
            None => {}
            Some(Task::Runtime(handle)) => {
                if let Err(e) = handle.await {
                    debug!("logfile cleanup task ended abnormally: {}", e);
                }
            }
            Some(Task::Thread(handle)) => {
                match tokio::task::spawn_blocking(move || handle.join()).await {
                    Ok(Ok(())) => {}
                    Ok(Err(_)) => debug!("logfile cleanup thread panicked"),
                    Err(e) => debug!("logfile cleanup task ended abnormally: {}", e),
                }
            }
        }
    }

    /// Block the current thread until the cleanup finishes.
    ///
    /// For callers without an async runtime. Must not be called from inside
    /// one while the cleanup runs on it.
    pub fn wait_blocking(self) {
        match self.task {
            None => {}
            Some(Task::Thread(handle)) => {
                if handle.join().is_err() {
                    debug!("logfile cleanup thread panicked");
                }
            }
            Some(Task::Runtime(handle)) => {
                if tokio::runtime::Handle::try_current().is_ok() {
                    debug!("logfile cleanup cannot be waited on synchronously inside a runtime");
                    return;
                }
                match current_thread_runtime() {
                    Ok(runtime) => {
                        if let Err(e) = runtime.block_on(handle) {
                            debug!("logfile cleanup task ended abnormally: {}", e);
                        }
                    }
                    Err(e) => debug!("logfile cleanup could not be waited on: {}", e),
                }
            }
        }
    }
}

fn current_thread_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// List debug log files matching `prefix`'s shape, oldest first, minus `ignore`.
///
/// Entries that cannot be read are skipped.
pub fn find_log_files(prefix: &Path, ignore: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let pattern = cleanup_pattern(prefix);
    Ok(readable_matches(glob::glob(&pattern)?, ignore))
}

fn readable_matches<E: Display>(
    entries: impl Iterator<Item = std::result::Result<PathBuf, E>>,
    ignore: &[PathBuf],
) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                trace!("logfile skipping unreadable log file: {}", e);
                None
            }
        })
        .filter(|path| !ignore.contains(path))
        .collect();

    files.sort();
    files
}

/// The oldest files to remove so at most `logs_max` unopened files remain
fn select_for_removal(mut files: Vec<PathBuf>, open: &[PathBuf], logs_max: i64) -> Vec<PathBuf> {
    files.retain(|f| !open.contains(f));
    files.sort();

    let to_delete = files.len() as i64 - logs_max;
    if to_delete <= 0 {
        return Vec::new();
    }
    files.truncate(to_delete as usize);
    files
}

/// Remove the oldest debug log files so at most `logs_max` remain, never
/// touching anything in `ignore`. `None` means unbounded; zero or negative
/// removes every file not in `ignore`.
pub async fn clean_logs(prefix: PathBuf, logs_max: Option<i64>, ignore: Vec<PathBuf>) {
    clean_logs_guarded(prefix, logs_max, Arc::new(RwLock::new(ignore))).await
}

async fn clean_logs_guarded(
    prefix: PathBuf,
    logs_max: Option<i64>,
    open_files: Arc<RwLock<Vec<PathBuf>>>,
) {
    if let Err(e) = remove_excess(&prefix, logs_max, &open_files).await {
        report_cleanup_error(&e, logs_max);
    }

    trace!("logfile done cleaning log files");
}

fn report_cleanup_error(error: &dyn Display, logs_max: Option<i64>) {
    // Nobody asked for log files, so nobody wants to hear about cleaning them
    if logs_max.map_or(true, |max| max > 0) {
        warn!("logfile error cleaning log files: {}", error);
    } else {
        trace!("logfile error cleaning log files: {}", error);
    }
}

async fn remove_excess(
    prefix: &Path,
    logs_max: Option<i64>,
    open_files: &Arc<RwLock<Vec<PathBuf>>>,
) -> Result<()> {
    let Some(logs_max) = logs_max else {
        return Ok(());
    };

    let listing_prefix = prefix.to_path_buf();
    let files = tokio::task::spawn_blocking(move || find_log_files(&listing_prefix, &[]))
        .await
        .map_err(|e| std::io::Error::new(ErrorKind::Other, e))??;

    // Snapshot after listing so a file opened meanwhile is not counted
    let open = open_files.read().clone();
    let doomed = select_for_removal(files, &open, logs_max);
    if doomed.is_empty() {
        return Ok(());
    }

    trace!("logfile start cleaning logs, removing {} files", doomed.len());

    for file in doomed {
        // A rotation may have opened this file since the snapshot was taken
        if open_files.read().contains(&file) {
            continue;
        }

        match tokio::fs::remove_file(&file).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => trace!("logfile error removing log file {}: {}", file.display(), e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::log_file_path;
    use std::fs;
    use tempfile::TempDir;

    const PREFIX: &str = "2024-05-01T10_20_30_000Z-";

    fn seed(dir: &TempDir, stamp: &str, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| {
                let path = log_file_path(&dir.path().join(stamp), &i.to_string());
                fs::write(&path, "old\n").unwrap();
                path
            })
            .collect()
    }

    fn remaining(dir: &TempDir) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_find_log_files_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        let older = seed(&dir, "2023-01-01T00_00_00_000Z-", 2);
        let newer = seed(&dir, PREFIX, 1);
        fs::write(dir.path().join("unrelated.txt"), "x").unwrap();

        let prefix = dir.path().join(PREFIX);
        let found = find_log_files(&prefix, &[]).unwrap();
        assert_eq!(found, vec![older[0].clone(), older[1].clone(), newer[0].clone()]);

        let found = find_log_files(&prefix, &newer).unwrap();
        assert_eq!(found, older);
    }

    #[tokio::test]
    async fn test_removes_oldest_first() {
        let dir = TempDir::new().unwrap();
        seed(&dir, "2023-01-01T00_00_00_000Z-", 3);
        seed(&dir, "2023-06-01T00_00_00_000Z-", 2);

        clean_logs(dir.path().join(PREFIX), Some(2), vec![]).await;

        assert_eq!(
            remaining(&dir),
            vec![
                "2023-06-01T00_00_00_000Z-debug-0.log",
                "2023-06-01T00_00_00_000Z-debug-1.log",
            ]
        );
    }

    #[tokio::test]
    async fn test_under_limit_keeps_everything() {
        let dir = TempDir::new().unwrap();
        seed(&dir, PREFIX, 3);
        clean_logs(dir.path().join(PREFIX), Some(3), vec![]).await;
        assert_eq!(remaining(&dir).len(), 3);

        clean_logs(dir.path().join(PREFIX), None, vec![]).await;
        assert_eq!(remaining(&dir).len(), 3);
    }

    #[tokio::test]
    async fn test_negative_limit_removes_all_but_ignored() {
        let dir = TempDir::new().unwrap();
        let files = seed(&dir, PREFIX, 4);
        clean_logs(dir.path().join(PREFIX), Some(-1), vec![files[1].clone()]).await;
        assert_eq!(remaining(&dir), vec![format!("{}debug-1.log", PREFIX)]);
    }

    #[tokio::test]
    async fn test_legacy_file_name_is_cleaned() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("2022-01-01T00_00_00_000Z-debug.log"), "x").unwrap();
        seed(&dir, PREFIX, 1);

        clean_logs(dir.path().join(PREFIX), Some(1), vec![]).await;
        assert_eq!(remaining(&dir), vec![format!("{}debug-0.log", PREFIX)]);
    }

    #[tokio::test]
    async fn test_missing_directory_is_not_fatal() {
        clean_logs(PathBuf::from("/nonexistent/dir/2024-"), Some(0), vec![]).await;
        clean_logs(PathBuf::from("/nonexistent/dir/2024-"), Some(5), vec![]).await;
    }

    #[tokio::test]
    async fn test_cleanup_handle_waits() {
        let dir = TempDir::new().unwrap();
        seed(&dir, PREFIX, 2);
        let open = Arc::new(RwLock::new(Vec::new()));
        let cleanup = Cleanup::spawn(dir.path().join(PREFIX), Some(0), open);
        cleanup.wait().await;
        assert!(remaining(&dir).is_empty());
    }

    #[test]
    fn test_spawn_outside_runtime_still_cleans() {
        let dir = TempDir::new().unwrap();
        seed(&dir, "2023-01-01T00_00_00_000Z-", 3);
        let open = Arc::new(RwLock::new(Vec::new()));

        let cleanup = Cleanup::spawn(dir.path().join(PREFIX), Some(1), open);
        cleanup.wait_blocking();

        assert_eq!(remaining(&dir), vec!["2023-01-01T00_00_00_000Z-debug-2.log"]);
    }

    #[tokio::test]
    async fn test_failed_removal_does_not_stop_the_batch() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be removed with remove_file
        fs::create_dir(dir.path().join("2020-01-01T00_00_00_000Z-debug-0.log")).unwrap();
        seed(&dir, "2021-01-01T00_00_00_000Z-", 2);
        seed(&dir, "2022-01-01T00_00_00_000Z-", 1);

        clean_logs(dir.path().join(PREFIX), Some(1), vec![]).await;

        assert_eq!(
            remaining(&dir),
            vec![
                "2020-01-01T00_00_00_000Z-debug-0.log",
                "2022-01-01T00_00_00_000Z-debug-0.log",
            ]
        );
    }

    #[derive(Clone, Default)]
    struct WarnCounter(Arc<std::sync::atomic::AtomicUsize>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCounter {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            }
        }
    }

    fn warnings_for(logs_max: Option<i64>) -> usize {
        use tracing_subscriber::layer::SubscriberExt;

        let counter = WarnCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        let error = std::io::Error::new(ErrorKind::PermissionDenied, "listing denied");
        tracing::subscriber::with_default(subscriber, || report_cleanup_error(&error, logs_max));
        counter.0.load(std::sync::atomic::Ordering::SeqCst)
    }

    #[test]
    fn test_listing_failure_warns_only_when_files_wanted() {
        assert_eq!(warnings_for(Some(10)), 1);
        assert_eq!(warnings_for(None), 1);
        assert_eq!(warnings_for(Some(0)), 0);
        assert_eq!(warnings_for(Some(-1)), 0);
    }

    #[test]
    fn test_open_files_not_counted_toward_retention() {
        let old = |n: u8| PathBuf::from(format!("/logs/2023-0{}-debug-0.log", n));
        let open = PathBuf::from("/logs/2024-01-debug-0.log");

        let doomed = select_for_removal(vec![old(2), open.clone(), old(1)], &[open], 1);
        assert_eq!(doomed, vec![old(1)]);

        assert!(select_for_removal(vec![old(1)], &[], 1).is_empty());
        assert_eq!(select_for_removal(vec![old(1), old(2)], &[], -3), vec![old(1), old(2)]);
    }

    #[test]
    fn test_unreadable_entries_are_skipped() {
        let entries = vec![
            Ok(PathBuf::from("/logs/b-debug-0.log")),
            Err(std::io::Error::new(ErrorKind::PermissionDenied, "denied")),
            Ok(PathBuf::from("/logs/a-debug-0.log")),
        ];

        let files = readable_matches(entries.into_iter(), &[]);
        assert_eq!(
            files,
            vec![PathBuf::from("/logs/a-debug-0.log"), PathBuf::from("/logs/b-debug-0.log")]
        );
    }
}
