use std::path::{Path, PathBuf};
use crate::config::ResolvedConfig;
use crate::errors::GatewayError;
use crate::models::ScanId;

pub const OPTIONS_SUFFIX: &str = "_generator_options.json";
pub const OUTPUT_SUFFIX: &str = "_output";
pub const LOG_SUFFIX: &str = "_garak.log";
/// Suffix the tool appends to its report prefix.
pub const REPORT_SUFFIX: &str = ".report.jsonl";

/// Directories shared by all scans. Files inside are namespaced by scan id.
#[derive(Debug, Clone)]
pub struct ScanWorkspace {
    pub config_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub logs_dir: PathBuf,
    /// The tool's own run-output directory, outside our control.
    pub runs_dir: Option<PathBuf>,
}

/// Every path one scan may create.
#[derive(Debug, Clone)]
pub struct ScanPaths {
    pub options_path: PathBuf,
    pub report_prefix: PathBuf,
    pub log_path: PathBuf,
    pub runs_dir: Option<PathBuf>,
}

impl ScanWorkspace {
    pub fn new(config_dir: impl Into<PathBuf>, temp_dir: impl Into<PathBuf>, logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            temp_dir: temp_dir.into(),
            logs_dir: logs_dir.into(),
            runs_dir: None,
        }
    }

    pub fn with_runs_dir(mut self, runs_dir: impl Into<PathBuf>) -> Self {
        self.runs_dir = Some(runs_dir.into());
        self
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            config_dir: config.config_dir.clone(),
            temp_dir: config.temp_dir.clone(),
            logs_dir: config.logs_dir.clone(),
            runs_dir: config.runs_dir.clone(),
        }
    }

    /// Create the managed directories. The runs directory belongs to the tool.
    pub async fn ensure(&self) -> Result<(), GatewayError> {
        for dir in [&self.config_dir, &self.temp_dir, &self.logs_dir] {
            tokio::fs::create_dir_all(dir).await?;
        }
        Ok(())
    }

    pub fn paths_for(&self, scan_id: &ScanId) -> ScanPaths {
        ScanPaths {
            options_path: self.config_dir.join(format!("{}{}", scan_id, OPTIONS_SUFFIX)),
            report_prefix: self.temp_dir.join(format!("{}{}", scan_id, OUTPUT_SUFFIX)),
            log_path: self.logs_dir.join(format!("{}{}", scan_id, LOG_SUFFIX)),
            runs_dir: self.runs_dir.clone(),
        }
    }
}

impl ScanPaths {
    /// File-name stem shared by every artifact the tool writes for this scan.
    pub fn output_basename(&self) -> String {
        file_name_lossy(&self.report_prefix)
    }

    /// Directory the report prefix points into.
    pub fn output_dir(&self) -> &Path {
        self.report_prefix.parent().unwrap_or_else(|| Path::new("."))
    }
}

pub(crate) fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
