use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use crate::errors::GatewayError;
use crate::models::{ScanId, ScanReport, ScanStatus};

/// Envelope returned by `POST /api/scan`.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub success: bool,
    pub scan_id: ScanId,
    pub name: String,
    pub status: ScanStatus,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub report: Option<ScanReport>,
}

impl ScanResponse {
    pub fn completed(scan_id: ScanId, name: String, report: ScanReport) -> Self {
        Self {
            success: true,
            scan_id,
            name,
            status: ScanStatus::Completed,
            timestamp: timestamp(),
            error: None,
            report: Some(report),
        }
    }

    /// Timeouts are reported as `failed`; the message says which deadline passed.
    pub fn failed(scan_id: ScanId, name: String, error: &GatewayError) -> Self {
        Self {
            success: false,
            scan_id,
            name,
            status: ScanStatus::Failed,
            timestamp: timestamp(),
            error: Some(error.to_string()),
            report: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    pub success: bool,
    pub error: String,
    pub details: Vec<String>,
}

impl ValidationErrorResponse {
    pub fn new(details: Vec<String>) -> Self {
        Self {
            success: false,
            error: "Validation failed".to_string(),
            details,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub built_at: Option<&'static str>,
    pub active_scans: usize,
}

/// ISO-8601 UTC with millisecond precision.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
