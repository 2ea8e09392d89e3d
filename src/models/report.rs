use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Reduced view of one tool report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub scan_summary: ScanSummary,
    pub detailed_results: Vec<AttemptRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total_attempts: usize,
    pub passed: usize,
    pub failed: usize,
}

/// One probe attempt. Only `passed` is interpreted; the tool's other fields
/// are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    #[serde(default, deserialize_with = "truthy_flag")]
    pub passed: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Key under which a non-object report line is kept.
pub const RAW_ENTRY_KEY: &str = "entry";

impl From<Value> for AttemptRecord {
    /// Any JSON value is a record. Eval summaries carry an integer `passed`,
    /// so the flag follows JSON truthiness rather than requiring a boolean.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(mut extra) => {
                let passed = extra.remove("passed").is_some_and(|v| is_truthy(&v));
                Self { passed, extra }
            }
            other => {
                let mut extra = Map::new();
                extra.insert(RAW_ENTRY_KEY.to_string(), other);
                Self { passed: false, extra }
            }
        }
    }
}

fn truthy_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|v| is_truthy(&v))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl ScanReport {
    pub fn from_records(records: Vec<AttemptRecord>) -> Self {
        let passed = records.iter().filter(|r| r.passed).count();
        Self {
            scan_summary: ScanSummary {
                total_attempts: records.len(),
                passed,
                failed: records.len() - passed,
            },
            detailed_results: records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(passed: bool) -> AttemptRecord {
        AttemptRecord { passed, extra: Map::new() }
    }

    #[test]
    fn test_summary_counts() {
        let report = ScanReport::from_records(vec![record(true), record(false), record(true)]);
        assert_eq!(report.scan_summary, ScanSummary { total_attempts: 3, passed: 2, failed: 1 });
        assert_eq!(report.detailed_results.len(), 3);
    }

    #[test]
    fn test_empty_report() {
        let report = ScanReport::from_records(Vec::new());
        assert_eq!(report.scan_summary.total_attempts, 0);
        assert_eq!(report.scan_summary.passed + report.scan_summary.failed, 0);
    }

    #[test]
    fn test_record_keeps_extra_fields() {
        let rec: AttemptRecord = serde_json::from_value(json!({
            "passed": false,
            "probe": "goodside.Tag",
            "outputs": ["x"]
        }))
        .unwrap();
        assert!(!rec.passed);
        assert_eq!(rec.extra["probe"], "goodside.Tag");
        let back = serde_json::to_value(&rec).unwrap();
        assert_eq!(back["outputs"][0], "x");
        assert_eq!(back["passed"], false);
    }

    #[test]
    fn test_non_boolean_passed_follows_truthiness() {
        let records: Vec<AttemptRecord> = [
            json!({"passed": true}),
            json!({"entry_type": "eval", "passed": 5, "total": 10}),
            json!({"passed": 0}),
            json!({"passed": null}),
            json!({"passed": "yes"}),
            json!(42),
        ]
        .into_iter()
        .map(AttemptRecord::from)
        .collect();

        let flags: Vec<bool> = records.iter().map(|r| r.passed).collect();
        assert_eq!(flags, [true, true, false, false, true, false]);
        assert_eq!(records[1].extra["total"], 10);
        assert!(!records[1].extra.contains_key("passed"));
        assert_eq!(records[5].extra[RAW_ENTRY_KEY], 42);
    }

    #[test]
    fn test_deserialize_accepts_integer_passed() {
        let rec: AttemptRecord = serde_json::from_value(json!({"passed": 1, "probe": "dan"})).unwrap();
        assert!(rec.passed);
        assert_eq!(rec.extra["probe"], "dan");
    }

    #[test]
    fn test_record_without_passed_counts_as_failed() {
        let rec: AttemptRecord = serde_json::from_value(json!({"entry_type": "attempt"})).unwrap();
        let report = ScanReport::from_records(vec![rec]);
        assert_eq!(report.scan_summary.failed, 1);
    }
}
