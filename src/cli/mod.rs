pub mod commands;
pub mod scan;
pub mod serve;
pub mod validate;

use std::path::Path;
use serde_json::Value;
use crate::errors::GatewayError;

pub use commands::{Cli, Commands};

/// Read a scan request body from disk.
pub(crate) async fn read_request_file(path: &str) -> Result<Value, GatewayError> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(GatewayError::Config(format!("Request file not found: {}", path.display())));
    }
    let content = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&content)
        .map_err(|e| GatewayError::Validation(vec![format!("Request file is not valid JSON: {}", e)]))
}
