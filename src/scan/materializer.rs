use std::path::Path;
use std::time::Duration;
use crate::errors::GatewayError;
use crate::models::{GeneratorOptions, RestGeneratorOptions, RestSection, ScanRequest};
use tracing::debug;

/// Root marker of the tool's JSON path syntax.
const JSON_PATH_ROOT: &str = "$.";

/// Turns a [`ScanRequest`] into the tool's generator options document.
#[derive(Debug, Clone)]
pub struct ConfigMaterializer {
    request_timeout: Duration,
}

impl ConfigMaterializer {
    pub fn new(request_timeout: Duration) -> Self {
        Self { request_timeout }
    }

    pub fn build(&self, request: &ScanRequest) -> GeneratorOptions {
        let mut headers = request.headers.clone();
        if let Some(key) = &request.api_key {
            headers.insert("Authorization".to_string(), format!("Bearer {}", key));
        }

        GeneratorOptions {
            rest: RestSection {
                rest_generator: RestGeneratorOptions {
                    uri: request.uri.clone(),
                    method: request.method.as_lower().to_string(),
                    headers,
                    req_template_json_object: request.body_template.clone(),
                    response_json: true,
                    response_json_field: normalize_response_field(&request.response_field),
                    request_timeout: self.request_timeout.as_secs(),
                },
            },
        }
    }

    /// Build and write the options document to `path`.
    pub async fn materialize(
        &self,
        request: &ScanRequest,
        path: &Path,
    ) -> Result<GeneratorOptions, GatewayError> {
        let options = self.build(request);
        let content = serde_json::to_string_pretty(&options)?;

        tokio::fs::write(path, content).await
            .map_err(|source| GatewayError::ConfigWrite { path: path.to_path_buf(), source })?;

        debug!(path = %path.display(), "Wrote generator options");
        Ok(options)
    }
}

/// Prefix `field` with `$.` unless it is already a rooted path expression.
pub fn normalize_response_field(field: &str) -> String {
    if field.starts_with('$') {
        field.to_string()
    } else {
        format!("{}{}", JSON_PATH_ROOT, field)
    }
}
