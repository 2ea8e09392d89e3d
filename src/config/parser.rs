use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::errors::GatewayError;
use super::types::*;
use super::schema::CONFIG_SCHEMA;
use tracing::{debug, warn};

pub async fn parse_config(path: &Path) -> Result<GatewayConfig, GatewayError> {
    if !path.exists() {
        return Err(GatewayError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(GatewayError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&content)?;

    // An empty file is a valid, all-defaults config
    if yaml.is_null() {
        return Ok(GatewayConfig::default());
    }

    validate_schema(&yaml)?;

    let config: GatewayConfig = serde_yaml::from_value(yaml)?;
    validate_values(&config)?;

    Ok(config)
}

/// Load the optional config file and resolve it against the process environment.
pub async fn load_config(path: Option<&Path>) -> Result<ResolvedConfig, GatewayError> {
    let config = match path {
        Some(path) => parse_config(path).await?,
        None => GatewayConfig::default(),
    };
    resolve_config(config, &EnvOverrides::from_process())
}

/// Apply defaults and environment overrides.
pub fn resolve_config(config: GatewayConfig, env: &EnvOverrides) -> Result<ResolvedConfig, GatewayError> {
    let server = config.server.unwrap_or_default();
    let paths = config.paths.unwrap_or_default();
    let tool = config.tool.unwrap_or_default();

    let port = match &env.port {
        Some(raw) => raw.parse::<u16>()
            .map_err(|_| GatewayError::Config(format!("Invalid PORT value: {}", raw)))?,
        None => server.port.unwrap_or(DEFAULT_PORT),
    };

    let runs_dir = match paths.runs_dir {
        Some(dir) => Some(PathBuf::from(dir)),
        None => env.home.as_ref().map(|home| home.join(RUNS_DIR_FROM_HOME)),
    };
    if runs_dir.is_none() {
        warn!("HOME is not set and no runs_dir configured; tool run artifacts will not be swept");
    }

    let defaults = ToolSettings::default();
    let resolved = ResolvedConfig {
        host: server.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port,
        config_dir: PathBuf::from(paths.config_dir.unwrap_or_else(|| "./config".to_string())),
        temp_dir: PathBuf::from(paths.temp_dir.unwrap_or_else(|| "./temp".to_string())),
        logs_dir: PathBuf::from(paths.logs_dir.unwrap_or_else(|| "./logs".to_string())),
        runs_dir,
        tool: ToolSettings {
            interpreter: tool.interpreter.map(PathBuf::from).unwrap_or(defaults.interpreter),
            interpreter_args: tool.interpreter_args.unwrap_or(defaults.interpreter_args),
            module: tool.module.unwrap_or(defaults.module),
            default_probe: tool.default_probe.unwrap_or(defaults.default_probe),
            request_timeout: tool.request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            scan_timeout: tool.scan_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.scan_timeout),
            terminate_on_timeout: tool.terminate_on_timeout.unwrap_or(defaults.terminate_on_timeout),
        },
    };

    debug!(
        config_dir = %resolved.config_dir.display(),
        temp_dir = %resolved.temp_dir.display(),
        logs_dir = %resolved.logs_dir.display(),
        "Resolved configuration"
    );

    Ok(resolved)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), GatewayError> {
    // Convert YAML value to JSON for schema validation
    let json_str = serde_json::to_string(yaml)
        .map_err(|e| GatewayError::Config(format!("Config conversion error: {}", e)))?;
    let json_value: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| GatewayError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| GatewayError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        // Advisory only; typed parsing below is authoritative
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

/// Reject values that parse but cannot work.
fn validate_values(config: &GatewayConfig) -> Result<(), GatewayError> {
    if let Some(tool) = &config.tool {
        if tool.interpreter.as_deref().is_some_and(|i| i.trim().is_empty()) {
            return Err(GatewayError::Config("tool.interpreter must not be empty".into()));
        }
        if tool.module.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(GatewayError::Config("tool.module must not be empty".into()));
        }
        if tool.scan_timeout_secs == Some(0) {
            return Err(GatewayError::Config("tool.scan_timeout_secs must be positive".into()));
        }
        if tool.request_timeout_secs == Some(0) {
            return Err(GatewayError::Config("tool.request_timeout_secs must be positive".into()));
        }
    }

    if let Some(paths) = &config.paths {
        let dirs = [&paths.config_dir, &paths.temp_dir, &paths.logs_dir];
        if dirs.iter().any(|d| d.as_deref().is_some_and(|d| d.trim().is_empty())) {
            return Err(GatewayError::Config("paths entries must not be empty".into()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_defaults() {
        let env = EnvOverrides { port: None, home: Some(PathBuf::from("/home/scanner")) };
        let resolved = resolve_config(GatewayConfig::default(), &env).unwrap();
        assert_eq!(resolved.port, 3000);
        assert_eq!(resolved.host, "0.0.0.0");
        assert_eq!(resolved.config_dir, PathBuf::from("./config"));
        assert_eq!(
            resolved.runs_dir,
            Some(PathBuf::from("/home/scanner/.local/share/garak/garak_runs"))
        );
        assert_eq!(resolved.tool.scan_timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_port_env_overrides_file() {
        let config = GatewayConfig {
            server: Some(ServerConfig { host: None, port: Some(8080) }),
            ..Default::default()
        };
        let env = EnvOverrides { port: Some("9090".into()), home: None };
        let resolved = resolve_config(config, &env).unwrap();
        assert_eq!(resolved.port, 9090);
        assert!(resolved.runs_dir.is_none());
    }

    #[test]
    fn test_invalid_port_env() {
        let env = EnvOverrides { port: Some("not-a-port".into()), home: None };
        let err = resolve_config(GatewayConfig::default(), &env).unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[test]
    fn test_explicit_runs_dir_wins_over_home() {
        let config = GatewayConfig {
            paths: Some(PathsConfig { runs_dir: Some("/srv/runs".into()), ..Default::default() }),
            ..Default::default()
        };
        let env = EnvOverrides { port: None, home: Some(PathBuf::from("/home/x")) };
        let resolved = resolve_config(config, &env).unwrap();
        assert_eq!(resolved.runs_dir, Some(PathBuf::from("/srv/runs")));
    }

    #[test]
    fn test_validate_values_rejects_zero_timeout() {
        let config = GatewayConfig {
            tool: Some(ToolConfig { scan_timeout_secs: Some(0), ..Default::default() }),
            ..Default::default()
        };
        assert!(validate_values(&config).is_err());
    }

    #[test]
    fn test_validate_values_empty_config() {
        assert!(validate_values(&GatewayConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_parse_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gateway.yaml");
        tokio::fs::write(&path, "server:\n  port: 4000\ntool:\n  interpreter: /usr/bin/python3\n  scan_timeout_secs: 120\n")
            .await
            .unwrap();
        let config = parse_config(&path).await.unwrap();
        assert_eq!(config.server.unwrap().port, Some(4000));
        let tool = config.tool.unwrap();
        assert_eq!(tool.interpreter.as_deref(), Some("/usr/bin/python3"));
        assert_eq!(tool.scan_timeout_secs, Some(120));
    }

    #[tokio::test]
    async fn test_parse_config_missing_file() {
        let err = parse_config(Path::new("/nonexistent/gateway.yaml")).await.unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[tokio::test]
    async fn test_parse_config_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.yaml");
        tokio::fs::write(&path, "").await.unwrap();
        let config = parse_config(&path).await.unwrap();
        assert!(config.tool.is_none());
    }
}
