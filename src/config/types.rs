use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_INTERPRETER: &str = "python3";
pub const DEFAULT_MODULE: &str = "garak";
pub const DEFAULT_PROBE: &str = "goodside.Tag";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SCAN_TIMEOUT_SECS: u64 = 300;
/// Run-output directory of the tool, relative to `$HOME`.
pub const RUNS_DIR_FROM_HOME: &str = ".local/share/garak/garak_runs";

/// Raw YAML configuration. Every section is optional.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GatewayConfig {
    pub server: Option<ServerConfig>,
    pub paths: Option<PathsConfig>,
    pub tool: Option<ToolConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PathsConfig {
    pub config_dir: Option<String>,
    pub temp_dir: Option<String>,
    pub logs_dir: Option<String>,
    /// Overrides the `$HOME`-relative run-output directory.
    pub runs_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ToolConfig {
    pub interpreter: Option<String>,
    /// Arguments placed before `-m <module>`, e.g. `["run", "python"]` for a launcher.
    pub interpreter_args: Option<Vec<String>>,
    pub module: Option<String>,
    pub default_probe: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub scan_timeout_secs: Option<u64>,
    pub terminate_on_timeout: Option<bool>,
}

/// Process environment values the service consults, captured once at startup.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub port: Option<String>,
    pub home: Option<PathBuf>,
}

impl EnvOverrides {
    pub fn from_process() -> Self {
        Self {
            port: std::env::var("PORT").ok().filter(|p| !p.is_empty()),
            home: std::env::var_os("HOME").map(PathBuf::from),
        }
    }
}

/// Fully resolved settings; nothing downstream reads the environment.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub host: String,
    pub port: u16,
    pub config_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub runs_dir: Option<PathBuf>,
    pub tool: ToolSettings,
}

#[derive(Debug, Clone)]
pub struct ToolSettings {
    pub interpreter: PathBuf,
    pub interpreter_args: Vec<String>,
    pub module: String,
    pub default_probe: String,
    pub request_timeout: Duration,
    pub scan_timeout: Duration,
    pub terminate_on_timeout: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            interpreter: PathBuf::from(DEFAULT_INTERPRETER),
            interpreter_args: Vec::new(),
            module: DEFAULT_MODULE.to_string(),
            default_probe: DEFAULT_PROBE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            scan_timeout: Duration::from_secs(DEFAULT_SCAN_TIMEOUT_SECS),
            terminate_on_timeout: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_config_default() {
        let config = GatewayConfig::default();
        assert!(config.server.is_none());
        assert!(config.paths.is_none());
        assert!(config.tool.is_none());
    }

    #[test]
    fn test_tool_settings_defaults() {
        let tool = ToolSettings::default();
        assert_eq!(tool.interpreter, PathBuf::from("python3"));
        assert!(tool.interpreter_args.is_empty());
        assert_eq!(tool.module, "garak");
        assert_eq!(tool.default_probe, "goodside.Tag");
        assert_eq!(tool.request_timeout, Duration::from_secs(30));
        assert_eq!(tool.scan_timeout, Duration::from_secs(300));
        assert!(tool.terminate_on_timeout);
    }

    #[test]
    fn test_tool_config_deserialize_partial() {
        let parsed: ToolConfig = serde_yaml::from_str("scan_timeout_secs: 60\n").unwrap();
        assert_eq!(parsed.scan_timeout_secs, Some(60));
        assert!(parsed.interpreter.is_none());
    }
}
