use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use crate::config::ToolSettings;
use crate::errors::types::exit_code_label;
use crate::errors::GatewayError;
use crate::models::ScanId;
use super::workspace::ScanPaths;
use tracing::{debug, error, info, warn};

/// How long to wait for pipe readers after a killed child before giving up on them.
const OUTPUT_GRACE: Duration = Duration::from_secs(2);

/// Everything needed to launch the tool for one scan.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub scan_id: &'a ScanId,
    pub paths: &'a ScanPaths,
    pub probes: Option<&'a [String]>,
    pub detectors: Option<&'a [String]>,
}

#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Contents of the per-scan log artifact.
    pub fn render_log(&self) -> String {
        format!(
            "STDOUT:\n{}\n\nSTDERR:\n{}\n\nExit Code: {}",
            self.stdout,
            self.stderr,
            exit_code_label(self.exit_code),
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// Runs the scanning tool as a child process and proves it exited cleanly.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    tool: ToolSettings,
}

impl ProcessRunner {
    pub fn new(tool: ToolSettings) -> Self {
        Self { tool }
    }

    pub fn tool(&self) -> &ToolSettings {
        &self.tool
    }

    pub fn build_args(&self, invocation: &Invocation<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-m".into(),
            self.tool.module.clone().into(),
            "--model_type".into(),
            "rest".into(),
            "--generator_option_file".into(),
            invocation.paths.options_path.clone().into(),
            "--report_prefix".into(),
            invocation.paths.report_prefix.clone().into(),
            "--verbose".into(),
        ];

        args.push("--probes".into());
        match non_empty(invocation.probes) {
            Some(probes) => args.push(probes.join(",").into()),
            None => args.push(self.tool.default_probe.clone().into()),
        }

        if let Some(detectors) = non_empty(invocation.detectors) {
            args.push("--detectors".into());
            args.push(detectors.join(",").into());
        }

        args
    }

    /// Run the tool to completion or until `deadline` elapses.
    ///
    /// On timeout the child is killed and reaped when `terminate_on_timeout`
    /// is set; otherwise it is left running and reaped in the background.
    pub async fn run(
        &self,
        invocation: &Invocation<'_>,
        deadline: Duration,
    ) -> Result<ProcessOutput, GatewayError> {
        let args = self.build_args(invocation);
        let scan_id = *invocation.scan_id;
        let log_path = invocation.paths.log_path.clone();

        info!(
            scan_id = %scan_id,
            interpreter = %self.tool.interpreter.display(),
            interpreter_args = ?self.tool.interpreter_args,
            args = ?args,
            "Executing Garak"
        );

        let mut child = Command::new(&self.tool.interpreter)
            .args(&self.tool.interpreter_args)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(self.tool.terminate_on_timeout)
            .spawn()
            .map_err(|e| {
                error!(scan_id = %scan_id, error = %e, "Failed to start Garak process");
                GatewayError::ProcessLaunch(e.to_string())
            })?;

        let stdout = spawn_drain(child.stdout.take(), scan_id, Stream::Stdout);
        let stderr = spawn_drain(child.stderr.take(), scan_id, Stream::Stderr);

        match tokio::time::timeout(deadline, child.wait()).await {
            Ok(Err(e)) => Err(record_wait_failure(&log_path, scan_id, stdout, stderr, e).await),
            Ok(Ok(status)) => {
                let (stdout, stderr) = tokio::join!(join_drain(stdout), join_drain(stderr));
                let output = ProcessOutput { exit_code: status.code(), stdout, stderr };
                write_log(&log_path, &output).await;

                if status.success() {
                    info!(scan_id = %scan_id, "Garak scan completed successfully");
                    Ok(output)
                } else {
                    error!(
                        scan_id = %scan_id,
                        exit_code = %exit_code_label(output.exit_code),
                        log = %log_path.display(),
                        "Garak scan failed"
                    );
                    Err(GatewayError::ProcessExecution { code: output.exit_code, log_path })
                }
            }
            Err(_) if self.tool.terminate_on_timeout => {
                warn!(scan_id = %scan_id, deadline_ms = deadline.as_millis() as u64, "Deadline elapsed, terminating Garak");
                if let Err(e) = child.kill().await {
                    warn!(scan_id = %scan_id, error = %e, "Failed to kill Garak process");
                }
                let (stdout, stderr) = tokio::join!(drain_with_grace(stdout), drain_with_grace(stderr));
                write_log(&log_path, &ProcessOutput { exit_code: None, stdout, stderr }).await;
                Err(GatewayError::Timeout(deadline))
            }
            Err(_) => {
                warn!(scan_id = %scan_id, "Deadline elapsed, leaving Garak running in background");
                tokio::spawn(async move {
                    let exit_code = child.wait().await.ok().and_then(|s| s.code());
                    let (stdout, stderr) = tokio::join!(join_drain(stdout), join_drain(stderr));
                    write_log(&log_path, &ProcessOutput { exit_code, stdout, stderr }).await;
                    debug!(scan_id = %scan_id, "Detached Garak process exited");
                });
                Err(GatewayError::Timeout(deadline))
            }
        }
    }
}

fn non_empty(list: Option<&[String]>) -> Option<&[String]> {
    list.filter(|l| !l.is_empty())
}

fn spawn_drain<R>(pipe: Option<R>, scan_id: ScanId, stream: Stream) -> JoinHandle<String>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut collected = String::new();
        let Some(pipe) = pipe else {
            return collected;
        };

        let mut reader = BufReader::new(pipe);
        let mut line = Vec::new();
        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line).await {
                Ok(0) => break,
                Ok(_) => {
                    let text = String::from_utf8_lossy(&line);
                    debug!(scan_id = %scan_id, stream = stream.as_str(), "{}", text.trim_end());
                    collected.push_str(&text);
                }
                Err(e) => {
                    warn!(scan_id = %scan_id, stream = stream.as_str(), error = %e, "Output stream read failed");
                    break;
                }
            }
        }
        collected
    })
}

async fn join_drain(handle: JoinHandle<String>) -> String {
    handle.await.unwrap_or_default()
}

/// A killed child's descendants may still hold the pipe open.
async fn drain_with_grace(mut handle: JoinHandle<String>) -> String {
    match tokio::time::timeout(OUTPUT_GRACE, &mut handle).await {
        Ok(joined) => joined.unwrap_or_default(),
        Err(_) => {
            handle.abort();
            String::new()
        }
    }
}

/// The child's status is unknown, so the log is written without an exit code.
async fn record_wait_failure(
    log_path: &Path,
    scan_id: ScanId,
    stdout: JoinHandle<String>,
    stderr: JoinHandle<String>,
    error: std::io::Error,
) -> GatewayError {
    error!(scan_id = %scan_id, error = %error, "Failed waiting for Garak process");
    let (stdout, stderr) = tokio::join!(drain_with_grace(stdout), drain_with_grace(stderr));
    write_log(log_path, &ProcessOutput { exit_code: None, stdout, stderr }).await;
    GatewayError::Io(error)
}

/// Best-effort: a log write failure never changes the scan outcome.
async fn write_log(path: &Path, output: &ProcessOutput) {
    if let Err(e) = tokio::fs::write(path, output.render_log()).await {
        warn!(path = %path.display(), error = %e, "Failed to write Garak log file");
    }
}
