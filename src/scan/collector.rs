use std::path::{Path, PathBuf};
use std::time::SystemTime;
use serde_json::Value;
use crate::errors::GatewayError;
use crate::models::{AttemptRecord, ScanReport};
use super::workspace::{file_name_lossy, ScanPaths, REPORT_SUFFIX};
use tracing::{debug, info, warn};

/// Finds and reduces the tool's JSONL report for one scan.
#[derive(Debug, Clone, Default)]
pub struct ResultCollector;

#[derive(Debug)]
struct Candidate {
    path: PathBuf,
    modified: SystemTime,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self
    }

    pub async fn collect(&self, paths: &ScanPaths) -> Result<ScanReport, GatewayError> {
        let report_path = self.locate(paths).await?;
        let content = tokio::fs::read_to_string(&report_path).await?;
        let report = parse_report(&content, &report_path)?;

        info!(
            report = %report_path.display(),
            total = report.scan_summary.total_attempts,
            passed = report.scan_summary.passed,
            failed = report.scan_summary.failed,
            "Parsed Garak report"
        );
        Ok(report)
    }

    /// Newest matching report across the output and run-output directories.
    pub async fn locate(&self, paths: &ScanPaths) -> Result<PathBuf, GatewayError> {
        let basename = paths.output_basename();
        let mut candidates = find_reports(paths.output_dir(), &basename).await;
        if let Some(runs_dir) = &paths.runs_dir {
            candidates.extend(find_reports(runs_dir, &basename).await);
        }

        if candidates.len() > 1 {
            warn!(
                count = candidates.len(),
                prefix = %basename,
                "Multiple Garak reports matched, using the most recent"
            );
        }

        candidates
            .into_iter()
            .max_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.path.cmp(&b.path)))
            .map(|c| c.path)
            .ok_or_else(|| GatewayError::ReportMissing {
                dir: paths.output_dir().to_path_buf(),
                runs_dir: paths.runs_dir.clone(),
                prefix: basename,
            })
    }
}

async fn find_reports(dir: &Path, basename: &str) -> Vec<Candidate> {
    let mut found = Vec::new();
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "Report directory not readable");
            return found;
        }
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        let name = file_name_lossy(&path);
        if !name.contains(basename) || !name.ends_with(REPORT_SUFFIX) {
            continue;
        }
        let modified = match entry.metadata().await {
            Ok(meta) if meta.is_file() => meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            _ => continue,
        };
        found.push(Candidate { path, modified });
    }

    found
}

/// Parse newline-delimited attempt records. A line that is not valid JSON fails
/// the whole report; any valid JSON value is kept as a record.
pub fn parse_report(content: &str, path: &Path) -> Result<ScanReport, GatewayError> {
    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .map_err(|source| GatewayError::ReportParse {
                path: path.to_path_buf(),
                line: idx + 1,
                source,
            })?;
        records.push(AttemptRecord::from(value));
    }
    Ok(ScanReport::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScanId;
    use crate::scan::workspace::ScanWorkspace;
    use std::time::Duration;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ScanPaths) {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("temp")).unwrap();
        let ws = ScanWorkspace::new(root.path().join("config"), root.path().join("temp"), root.path().join("logs"));
        let paths = ws.paths_for(&ScanId::new());
        (root, paths)
    }

    fn report_path(paths: &ScanPaths, dir: &Path) -> PathBuf {
        dir.join(format!("{}{}", paths.output_basename(), REPORT_SUFFIX))
    }

    #[test]
    fn test_parse_report_counts() {
        let content = "{\"passed\": true}\n{\"passed\": false, \"probe\": \"x\"}\n{\"passed\": true}\n";
        let report = parse_report(content, Path::new("r.report.jsonl")).unwrap();
        assert_eq!(report.scan_summary.total_attempts, 3);
        assert_eq!(report.scan_summary.passed, 2);
        assert_eq!(report.scan_summary.failed, 1);
        assert_eq!(report.detailed_results[1].extra["probe"], "x");
    }

    #[test]
    fn test_parse_report_rejects_malformed_line() {
        let content = "{\"passed\": true}\nnot json\n";
        let err = parse_report(content, Path::new("r.report.jsonl")).unwrap_err();
        match err {
            GatewayError::ReportParse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_report_keeps_non_object_line_as_failed_attempt() {
        let report = parse_report("42\n", Path::new("r")).unwrap();
        assert_eq!(report.scan_summary.total_attempts, 1);
        assert_eq!(report.scan_summary.failed, 1);
    }

    #[test]
    fn test_parse_report_accepts_eval_entries() {
        let content = concat!(
            "{\"passed\": true}\n",
            "{\"entry_type\": \"eval\", \"passed\": 5, \"total\": 10}\n",
            "{\"passed\": null}\n",
        );
        let report = parse_report(content, Path::new("r.report.jsonl")).unwrap();
        assert_eq!(report.scan_summary.total_attempts, 3);
        assert_eq!(report.scan_summary.passed, 2);
        assert_eq!(report.scan_summary.failed, 1);
        assert_eq!(report.detailed_results[1].extra["entry_type"], "eval");
    }

    #[test]
    fn test_parse_report_skips_blank_lines() {
        let report = parse_report("\n{\"passed\": true}\n\n", Path::new("r")).unwrap();
        assert_eq!(report.scan_summary.total_attempts, 1);
    }

    #[test]
    fn test_parse_empty_report() {
        let report = parse_report("", Path::new("r")).unwrap();
        assert_eq!(report.scan_summary.total_attempts, 0);
        assert!(report.detailed_results.is_empty());
    }

    #[tokio::test]
    async fn test_collect_missing_report() {
        let (_root, paths) = setup();
        let err = ResultCollector::new().collect(&paths).await.unwrap_err();
        assert!(matches!(err, GatewayError::ReportMissing { .. }));
        assert!(err.to_string().contains(&paths.output_basename()));
    }

    #[tokio::test]
    async fn test_collect_missing_report_names_runs_dir() {
        let (root, mut paths) = setup();
        let runs = root.path().join("runs");
        std::fs::create_dir_all(&runs).unwrap();
        paths.runs_dir = Some(runs.clone());

        let err = ResultCollector::new().collect(&paths).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains(&paths.output_dir().display().to_string()));
        assert!(msg.contains(&runs.display().to_string()));
    }

    #[tokio::test]
    async fn test_collect_ignores_other_scans_and_suffixes() {
        let (_root, paths) = setup();
        let dir = paths.output_dir().to_path_buf();
        let other = ScanId::new();
        tokio::fs::write(dir.join(format!("{}_output{}", other, REPORT_SUFFIX)), "{\"passed\": true}\n")
            .await
            .unwrap();
        tokio::fs::write(dir.join(format!("{}.hitlog.jsonl", paths.output_basename())), "{}\n")
            .await
            .unwrap();

        let err = ResultCollector::new().collect(&paths).await.unwrap_err();
        assert!(matches!(err, GatewayError::ReportMissing { .. }));
    }

    #[tokio::test]
    async fn test_collect_reads_matching_report() {
        let (_root, paths) = setup();
        let path = report_path(&paths, paths.output_dir());
        tokio::fs::write(&path, "{\"passed\": true}\n{\"passed\": false}\n").await.unwrap();

        let report = ResultCollector::new().collect(&paths).await.unwrap();
        assert_eq!(report.scan_summary.total_attempts, 2);
        assert_eq!(report.scan_summary.passed, 1);
    }

    #[tokio::test]
    async fn test_collect_falls_back_to_runs_dir() {
        let (root, mut paths) = setup();
        let runs = root.path().join("runs");
        tokio::fs::create_dir_all(&runs).await.unwrap();
        paths.runs_dir = Some(runs.clone());
        tokio::fs::write(report_path(&paths, &runs), "{\"passed\": false}\n").await.unwrap();

        let report = ResultCollector::new().collect(&paths).await.unwrap();
        assert_eq!(report.scan_summary.failed, 1);
    }

    #[tokio::test]
    async fn test_locate_prefers_newest_report() {
        let (_root, paths) = setup();
        let dir = paths.output_dir().to_path_buf();
        let older = dir.join(format!("a_{}{}", paths.output_basename(), REPORT_SUFFIX));
        let newer = dir.join(format!("b_{}{}", paths.output_basename(), REPORT_SUFFIX));
        tokio::fs::write(&older, "{\"passed\": true}\n").await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        tokio::fs::write(&newer, "{\"passed\": false}\n").await.unwrap();

        let located = ResultCollector::new().locate(&paths).await.unwrap();
        assert_eq!(located, newer);
    }
}
