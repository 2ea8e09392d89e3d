//! Scan orchestration: one generator-options file in, one reduced report out,
//! with every transient file namespaced by the scan id and swept afterwards.

pub mod workspace;
pub mod materializer;
pub mod runner;
pub mod collector;
pub mod cleanup;
pub mod orchestrator;

use async_trait::async_trait;
use crate::errors::GatewayError;
use crate::models::{ScanId, ScanReport, ScanRequest};

pub use cleanup::{CleanupReport, CleanupSweeper};
pub use collector::ResultCollector;
pub use materializer::{normalize_response_field, ConfigMaterializer};
pub use orchestrator::ScanOrchestrator;
pub use runner::{Invocation, ProcessOutput, ProcessRunner};
pub use workspace::{ScanPaths, ScanWorkspace};

/// Runs a single scan to a terminal state.
#[async_trait]
pub trait ScanExecutor: Send + Sync {
    async fn run_scan(&self, scan_id: &ScanId, request: &ScanRequest) -> Result<ScanReport, GatewayError>;
}
