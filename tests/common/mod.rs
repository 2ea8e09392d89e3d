#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;
use garak_gateway::config::ToolSettings;
use garak_gateway::scan::{ScanOrchestrator, ScanWorkspace};
use tempfile::TempDir;

/// Shell stand-in for the tool: parses `--report_prefix` then runs `body`.
pub fn fake_tool(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake-garak.sh");
    let script = format!(
        "#!/bin/sh\nprefix=\"\"\nwhile [ $# -gt 0 ]; do\n  case \"$1\" in\n    --report_prefix) prefix=\"$2\"; shift 2 ;;\n    *) shift ;;\n  esac\ndone\n{}\n",
        body
    );
    std::fs::write(&path, script).unwrap();
    path
}

pub struct Sandbox {
    pub root: TempDir,
    pub workspace: ScanWorkspace,
}

impl Sandbox {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        let workspace = ScanWorkspace::new(
            root.path().join("config"),
            root.path().join("temp"),
            root.path().join("logs"),
        )
        .with_runs_dir(root.path().join("runs"));
        for dir in ["config", "temp", "logs", "runs"] {
            std::fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        Self { root, workspace }
    }

    pub fn orchestrator(&self, body: &str, timeout: Duration) -> ScanOrchestrator {
        let script = fake_tool(self.root.path(), body);
        let tool = ToolSettings {
            interpreter: PathBuf::from("/bin/sh"),
            interpreter_args: vec![script.display().to_string()],
            scan_timeout: timeout,
            ..ToolSettings::default()
        };
        ScanOrchestrator::new(self.workspace.clone(), tool)
    }

    /// Names of files in the swept directories that mention `needle`.
    pub fn leftovers(&self, needle: &str) -> Vec<String> {
        let mut found = Vec::new();
        for dir in ["config", "temp", "runs"] {
            for entry in std::fs::read_dir(self.root.path().join(dir)).unwrap() {
                let name = entry.unwrap().file_name().to_string_lossy().into_owned();
                if name.contains(needle) {
                    found.push(format!("{}/{}", dir, name));
                }
            }
        }
        found
    }

    pub fn file_count(&self, dir: &str) -> usize {
        std::fs::read_dir(self.root.path().join(dir)).unwrap().count()
    }
}

/// Body that writes `lines` as the JSONL report and exits cleanly.
pub fn report_body(lines: &[&str]) -> String {
    let mut body = String::from(": > \"${prefix}.report.jsonl\"\n");
    for line in lines {
        body.push_str(&format!("echo '{}' >> \"${{prefix}}.report.jsonl\"\n", line));
    }
    body.push_str("echo scan finished\nexit 0");
    body
}
