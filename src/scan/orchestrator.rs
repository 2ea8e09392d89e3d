use std::time::{Duration, Instant};
use async_trait::async_trait;
use crate::config::{ResolvedConfig, ToolSettings};
use crate::errors::GatewayError;
use crate::models::{ScanId, ScanReport, ScanRequest, ScanStatus};
use super::cleanup::CleanupSweeper;
use super::collector::ResultCollector;
use super::materializer::ConfigMaterializer;
use super::runner::{Invocation, ProcessRunner};
use super::workspace::{ScanPaths, ScanWorkspace};
use super::ScanExecutor;
use tracing::{error, info, warn};

/// Owns one scan's lifecycle: materialize, run, collect, then always clean up.
pub struct ScanOrchestrator {
    workspace: ScanWorkspace,
    materializer: ConfigMaterializer,
    runner: ProcessRunner,
    collector: ResultCollector,
    sweeper: CleanupSweeper,
    deadline: Duration,
}

impl ScanOrchestrator {
    pub fn new(workspace: ScanWorkspace, tool: ToolSettings) -> Self {
        Self {
            workspace,
            materializer: ConfigMaterializer::new(tool.request_timeout),
            deadline: tool.scan_timeout,
            runner: ProcessRunner::new(tool),
            collector: ResultCollector::new(),
            sweeper: CleanupSweeper::new(),
        }
    }

    /// Build from resolved configuration, creating the managed directories.
    pub async fn from_config(config: &ResolvedConfig) -> Result<Self, GatewayError> {
        let workspace = ScanWorkspace::from_config(config);
        workspace.ensure().await?;
        Ok(Self::new(workspace, config.tool.clone()))
    }

    pub fn workspace(&self) -> &ScanWorkspace {
        &self.workspace
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Run one scan end to end. Cleanup runs exactly once, whatever the outcome.
    pub async fn run(&self, scan_id: &ScanId, request: &ScanRequest) -> Result<ScanReport, GatewayError> {
        let started = Instant::now();
        let paths = self.workspace.paths_for(scan_id);
        info!(scan_id = %scan_id, name = %request.name, status = %ScanStatus::Running, "Starting scan");

        let outcome = self.execute(scan_id, request, &paths).await;

        let cleanup = self.sweeper.sweep(&paths).await;
        if !cleanup.is_clean() {
            warn!(scan_id = %scan_id, failures = cleanup.failures.len(), "Scan artifacts only partially removed");
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(report) => info!(
                scan_id = %scan_id,
                status = %ScanStatus::Completed,
                total = report.scan_summary.total_attempts,
                elapsed_ms,
                "Scan finished"
            ),
            Err(e) => error!(
                scan_id = %scan_id,
                status = %e.terminal_status(),
                error_type = e.classify().error_type,
                error = %e,
                elapsed_ms,
                "Scan finished"
            ),
        }

        outcome
    }

    async fn execute(
        &self,
        scan_id: &ScanId,
        request: &ScanRequest,
        paths: &ScanPaths,
    ) -> Result<ScanReport, GatewayError> {
        self.materializer.materialize(request, &paths.options_path).await?;

        let invocation = Invocation {
            scan_id,
            paths,
            probes: request.probes.as_deref(),
            detectors: request.detectors.as_deref(),
        };
        self.runner.run(&invocation, self.deadline).await?;

        self.collector.collect(paths).await
    }
}

#[async_trait]
impl ScanExecutor for ScanOrchestrator {
    async fn run_scan(&self, scan_id: &ScanId, request: &ScanRequest) -> Result<ScanReport, GatewayError> {
        self.run(scan_id, request).await
    }
}
