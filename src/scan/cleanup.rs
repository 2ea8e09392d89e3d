use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use super::workspace::{file_name_lossy, ScanPaths};
use tracing::{debug, warn};

/// A file the sweeper could not remove.
#[derive(Debug)]
pub struct CleanupFailure {
    pub path: PathBuf,
    pub error: std::io::Error,
}

/// Outcome of a sweep. Never turned into a scan error.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub failures: Vec<CleanupFailure>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn remove_result(&mut self, path: PathBuf, result: std::io::Result<()>) {
        match result {
            Ok(()) => self.removed.push(path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(error) => self.failures.push(CleanupFailure { path, error }),
        }
    }
}

/// Removes every transient file belonging to one scan.
#[derive(Debug, Clone, Default)]
pub struct CleanupSweeper;

impl CleanupSweeper {
    pub fn new() -> Self {
        Self
    }

    pub async fn sweep(&self, paths: &ScanPaths) -> CleanupReport {
        let mut report = CleanupReport::default();
        let basename = paths.output_basename();

        let result = tokio::fs::remove_file(&paths.options_path).await;
        report.remove_result(paths.options_path.clone(), result);

        sweep_dir(paths.output_dir(), &basename, &mut report).await;
        if let Some(runs_dir) = &paths.runs_dir {
            sweep_dir(runs_dir, &basename, &mut report).await;
        }

        for failure in &report.failures {
            warn!(path = %failure.path.display(), error = %failure.error, "Cleanup failed");
        }
        debug!(removed = report.removed.len(), prefix = %basename, "Cleanup finished");

        report
    }
}

async fn sweep_dir(dir: &Path, basename: &str, report: &mut CleanupReport) {
    if basename.is_empty() {
        return;
    }
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return,
        Err(error) => {
            report.failures.push(CleanupFailure { path: dir.to_path_buf(), error });
            return;
        }
    };

    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let path = entry.path();
                if !file_name_lossy(&path).contains(basename) {
                    continue;
                }
                let result = tokio::fs::remove_file(&path).await;
                report.remove_result(path, result);
            }
            Ok(None) => break,
            Err(error) => {
                report.failures.push(CleanupFailure { path: dir.to_path_buf(), error });
                break;
            }
        }
    }
}
