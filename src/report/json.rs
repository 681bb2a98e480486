//! JSON report persistence

use crate::benchmark::types::BenchmarkReport;
use crate::BenchError;
use std::fs;
use std::path::Path;
use tracing::info;

/// Generate a prettified JSON report
pub fn generate_json_report(report: &BenchmarkReport) -> Result<String, BenchError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Write `report` to `path`, replacing any previous report there.
///
/// The destination directory must already exist; it is not created here.
pub fn write_report(report: &BenchmarkReport, path: &Path) -> Result<(), BenchError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.is_dir() {
        return Err(BenchError::ReportWrite(format!(
            "destination directory {} does not exist",
            parent.display()
        )));
    }

    let json = generate_json_report(report)
        .map_err(|e| BenchError::ReportWrite(format!("cannot serialize report: {}", e)))?;
    fs::write(path, json).map_err(|e| {
        BenchError::ReportWrite(format!("cannot write {}: {}", path.display(), e))
    })?;

    info!(path = %path.display(), "Report written");
    Ok(())
}

/// Load a previously written report
pub fn load_report(path: &Path) -> Result<BenchmarkReport, BenchError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::aggregate::aggregate;
    use crate::benchmark::types::{AccuracyRecord, DatasetEntry, RunResult};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_report() -> BenchmarkReport {
        let mut report = BenchmarkReport::new(["MUSCLE", "PSAlign"]);
        report
            .record(
                "MUSCLE",
                "d1",
                DatasetEntry::Success(RunResult {
                    duration: 0.25,
                    accuracy: AccuracyRecord {
                        sp_score: 0.95,
                        modeler: 0.9,
                        spfn: 0.05,
                        spfp: 0.03,
                        tc: 0.8,
                    },
                }),
            )
            .unwrap();
        report
            .record(
                "MUSCLE",
                "d2",
                DatasetEntry::failed(&BenchError::ToolExecution("muscle crashed".to_string())),
            )
            .unwrap();
        aggregate(&mut report);
        report
    }

    #[test]
    fn test_write_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Benchmark_results.json");
        let report = sample_report();

        write_report(&report, &path).unwrap();
        let loaded = load_report(&path).unwrap();

        assert_eq!(loaded, report);
    }

    #[test]
    fn test_written_file_is_nested_mapping() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        write_report(&sample_report(), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(value["MUSCLE"]["d1"]["status"], "ok");
        assert_eq!(value["MUSCLE"]["d2"]["status"], "failed");
        assert_eq!(value["MUSCLE"]["average"]["datasets"], 1);
        assert_eq!(value["PSAlign"], serde_json::json!({}));
    }

    #[test]
    fn test_overwrites_previous_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        fs::write(&path, "stale").unwrap();

        write_report(&sample_report(), &path).unwrap();

        assert!(load_report(&path).is_ok());
    }

    #[test]
    fn test_missing_directory_fails_loudly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("report.json");

        match write_report(&sample_report(), &path) {
            Err(BenchError::ReportWrite(msg)) => assert!(msg.contains("does not exist")),
            other => panic!("Expected ReportWrite error, got {:?}", other),
        }
        assert!(!path.exists());
    }
}
