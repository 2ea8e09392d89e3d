use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// On-disk `--generator_option_file` document for the tool's REST generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorOptions {
    pub rest: RestSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestSection {
    #[serde(rename = "RestGenerator")]
    pub rest_generator: RestGeneratorOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestGeneratorOptions {
    pub uri: String,
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub req_template_json_object: Value,
    pub response_json: bool,
    pub response_json_field: String,
    /// Seconds the tool waits for each call to the target.
    pub request_timeout: u64,
}

impl GeneratorOptions {
    pub fn generator(&self) -> &RestGeneratorOptions {
        &self.rest.rest_generator
    }
}
