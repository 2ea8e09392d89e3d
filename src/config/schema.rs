use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "server": {
                "type": "object",
                "properties": {
                    "host": { "type": "string" },
                    "port": { "type": "integer", "minimum": 1, "maximum": 65535 }
                }
            },
            "paths": {
                "type": "object",
                "properties": {
                    "config_dir": { "type": "string" },
                    "temp_dir": { "type": "string" },
                    "logs_dir": { "type": "string" },
                    "runs_dir": { "type": "string" }
                }
            },
            "tool": {
                "type": "object",
                "properties": {
                    "interpreter": { "type": "string" },
                    "interpreter_args": { "type": "array", "items": { "type": "string" } },
                    "module": { "type": "string" },
                    "default_probe": { "type": "string" },
                    "request_timeout_secs": { "type": "integer", "minimum": 1 },
                    "scan_timeout_secs": { "type": "integer", "minimum": 1 },
                    "terminate_on_timeout": { "type": "boolean" }
                }
            }
        }
    })
});
