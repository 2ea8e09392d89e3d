use super::types::GatewayError;
use crate::models::ScanStatus;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    /// Whether the error ended a scan that had already been accepted.
    pub scan_failure: bool,
}

impl GatewayError {
    /// Classify this error for logging and exit-code selection.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            GatewayError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                scan_failure: false,
            },
            GatewayError::Validation(_) => ErrorClassification {
                error_type: "ValidationError",
                scan_failure: false,
            },
            GatewayError::ConfigWrite { .. } => ErrorClassification {
                error_type: "ConfigWriteError",
                scan_failure: true,
            },
            GatewayError::ProcessLaunch(_) => ErrorClassification {
                error_type: "ProcessLaunchError",
                scan_failure: true,
            },
            GatewayError::ProcessExecution { .. } => ErrorClassification {
                error_type: "ProcessExecutionError",
                scan_failure: true,
            },
            GatewayError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                scan_failure: true,
            },
            GatewayError::ReportMissing { .. } => ErrorClassification {
                error_type: "ReportMissingError",
                scan_failure: true,
            },
            GatewayError::ReportParse { .. } => ErrorClassification {
                error_type: "ReportParseError",
                scan_failure: true,
            },
            GatewayError::Io(_) => ErrorClassification {
                error_type: "IoError",
                scan_failure: true,
            },
            GatewayError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                scan_failure: true,
            },
            GatewayError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                scan_failure: false,
            },
            GatewayError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                scan_failure: true,
            },
        }
    }

    /// Terminal state a scan lands in when it ends with this error.
    pub fn terminal_status(&self) -> ScanStatus {
        match self {
            GatewayError::Timeout(_) => ScanStatus::TimedOut,
            _ => ScanStatus::Failed,
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            GatewayError::Config(_) | GatewayError::Yaml(_) => 2,
            GatewayError::Validation(_) => 3,
            GatewayError::ProcessLaunch(_) | GatewayError::ProcessExecution { .. } => 4,
            GatewayError::Timeout(_) => 5,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_timeout_is_timed_out() {
        let err = GatewayError::Timeout(Duration::from_secs(1));
        assert_eq!(err.terminal_status(), ScanStatus::TimedOut);
        assert_eq!(err.classify().error_type, "TimeoutError");
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_report_errors_are_failed() {
        let err = GatewayError::ReportMissing {
            dir: PathBuf::from("/tmp"),
            runs_dir: None,
            prefix: "abc_output".into(),
        };
        assert_eq!(err.terminal_status(), ScanStatus::Failed);
        assert!(err.classify().scan_failure);
    }

    #[test]
    fn test_validation_is_not_scan_failure() {
        let err = GatewayError::Validation(vec!["name is required and must be a string".into()]);
        assert!(!err.classify().scan_failure);
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_config_exit_code() {
        assert_eq!(GatewayError::Config("bad".into()).exit_code(), 2);
        assert_eq!(GatewayError::Internal("x".into()).exit_code(), 1);
    }
}
