use serde_json::Value;
use crate::errors::GatewayError;
use crate::models::{template_has_placeholder, ScanRequest};

/// Check a raw request body and convert it into a [`ScanRequest`].
///
/// All violations are reported together so a caller can fix them in one go.
pub fn validate_scan_request(body: &Value) -> Result<ScanRequest, GatewayError> {
    let errors = collect_violations(body);
    if !errors.is_empty() {
        return Err(GatewayError::Validation(errors));
    }

    serde_json::from_value(body.clone())
        .map_err(|e| GatewayError::Validation(vec![e.to_string()]))
}

fn collect_violations(body: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    if non_empty_str(body.get("name")).is_none() {
        errors.push("name is required and must be a string".to_string());
    }

    if non_empty_str(body.get("uri")).is_none() {
        errors.push("uri is required and must be a string".to_string());
    }

    let method_ok = non_empty_str(body.get("method"))
        .map(|m| matches!(m.to_ascii_uppercase().as_str(), "GET" | "POST"))
        .unwrap_or(false);
    if !method_ok {
        errors.push("method is required and must be GET or POST".to_string());
    }

    match body.get("headers") {
        Some(Value::Object(map)) => {
            if map.values().any(|v| !v.is_string()) {
                errors.push("headers values must be strings".to_string());
            }
        }
        _ => errors.push("headers is required and must be an object".to_string()),
    }

    match body.get("body_template") {
        Some(template @ (Value::Object(_) | Value::Array(_))) => {
            if !template_has_placeholder(template) {
                errors.push("body_template must contain $INPUT placeholder".to_string());
            }
        }
        _ => errors.push("body_template is required and must be an object".to_string()),
    }

    match non_empty_str(body.get("response_field")) {
        None => errors.push("response_field is required and must be a string".to_string()),
        Some(field) if matches!(field.trim(), "$" | "$.") => {
            errors.push("response_field must name a field, not the document root".to_string());
        }
        Some(_) => {}
    }

    match body.get("api_key") {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(_) => errors.push("api_key must be a string".to_string()),
    }

    for key in ["probes", "detectors"] {
        if !is_optional_string_list(body.get(key)) {
            errors.push(format!("{} must be an array of strings", key));
        }
    }

    errors
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

fn is_optional_string_list(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Array(items)) => items
            .iter()
            .all(|item| item.as_str().is_some_and(|s| !s.trim().is_empty())),
        Some(_) => false,
    }
}
