use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Failed to write generator options file {}: {source}", .path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start Garak: {0}")]
    ProcessLaunch(String),

    #[error("Garak execution failed with exit code {}. Check logs at {}", code_label(.code), .log_path.display())]
    ProcessExecution {
        code: Option<i32>,
        log_path: PathBuf,
    },

    #[error("Scan timeout after {}", deadline_label(.0))]
    Timeout(Duration),

    #[error("No Garak report files found in {} with prefix {prefix}", searched_label(.dir, .runs_dir))]
    ReportMissing {
        dir: PathBuf,
        runs_dir: Option<PathBuf>,
        prefix: String,
    },

    #[error("Failed to parse scan results: malformed line {line} in {}: {source}", .path.display())]
    ReportParse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Signal-terminated children have no exit code.
pub fn exit_code_label(code: Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

fn code_label(code: &Option<i32>) -> String {
    exit_code_label(*code)
}

fn searched_label(dir: &Path, runs_dir: &Option<PathBuf>) -> String {
    match runs_dir {
        Some(runs) => format!("{} or {}", dir.display(), runs.display()),
        None => dir.display().to_string(),
    }
}

fn deadline_label(deadline: &Duration) -> String {
    let secs = deadline.as_secs();
    match secs {
        0 => format!("{}ms", deadline.as_millis()),
        60 => "1 minute".to_string(),
        s if s % 60 == 0 => format!("{} minutes", s / 60),
        s => format!("{} seconds", s),
    }
}
