//! Per-tool averaging over successful datasets

use super::types::{AccuracyRecord, AverageEntry, BenchmarkReport, ToolReport};
use tracing::debug;

/// Compute the average entry of every tool in `report`.
///
/// Only successful dataset entries contribute. A tool without any successful
/// dataset gets no average. Existing averages are replaced, never folded in,
/// so aggregating twice yields the same report.
pub fn aggregate(report: &mut BenchmarkReport) {
    for (tool, results) in report.tools_mut() {
        let average = average_of(results);
        match average {
            Some(ref avg) => debug!(
                tool = %tool,
                datasets = avg.datasets,
                duration = avg.duration,
                sp_score = avg.accuracy.sp_score,
                "Averaged"
            ),
            None => debug!(tool = %tool, "No successful datasets, skipping average"),
        }
        results.set_average(average);
    }
}

/// Means of duration and every accuracy field, or `None` with no successes
pub fn average_of(results: &ToolReport) -> Option<AverageEntry> {
    let mut count = 0usize;
    let mut duration = 0.0;
    let mut sums = AccuracyRecord::default();

    for (_, result) in results.successes() {
        count += 1;
        duration += result.duration;
        sums.sp_score += result.accuracy.sp_score;
        sums.modeler += result.accuracy.modeler;
        sums.spfn += result.accuracy.spfn;
        sums.spfp += result.accuracy.spfp;
        sums.tc += result.accuracy.tc;
    }

    if count == 0 {
        return None;
    }

    let n = count as f64;
    Some(AverageEntry {
        datasets: count,
        duration: duration / n,
        accuracy: AccuracyRecord {
            sp_score: sums.sp_score / n,
            modeler: sums.modeler / n,
            spfn: sums.spfn / n,
            spfp: sums.spfp / n,
            tc: sums.tc / n,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::types::{DatasetEntry, RunResult};
    use crate::BenchError;
    use pretty_assertions::assert_eq;

    fn success(duration: f64, sp_score: f64, tc: f64) -> DatasetEntry {
        DatasetEntry::Success(RunResult {
            duration,
            accuracy: AccuracyRecord {
                sp_score,
                modeler: sp_score,
                spfn: 1.0 - sp_score,
                spfp: 0.0,
                tc,
            },
        })
    }

    #[test]
    fn test_two_datasets_average() {
        let mut report = BenchmarkReport::new(["X"]);
        report.record("X", "d1", success(2.0, 1.0, 0.5)).unwrap();
        report.record("X", "d2", success(4.0, 0.5, 0.25)).unwrap();

        aggregate(&mut report);

        let average = report.tool("X").unwrap().average().unwrap();
        assert_eq!(average.datasets, 2);
        assert_eq!(average.duration, 3.0);
        assert_eq!(average.accuracy.sp_score, 0.75);
        assert_eq!(average.accuracy.modeler, 0.75);
        assert_eq!(average.accuracy.spfn, 0.25);
        assert_eq!(average.accuracy.spfp, 0.0);
        assert_eq!(average.accuracy.tc, 0.375);
    }

    #[test]
    fn test_exact_sum_over_count() {
        let values = [0.1, 0.2, 0.7];
        let mut report = BenchmarkReport::new(["X"]);
        for (i, v) in values.iter().enumerate() {
            report.record("X", format!("d{}", i), success(*v, *v, *v)).unwrap();
        }

        aggregate(&mut report);

        let expected = (0.1 + 0.2 + 0.7) / 3.0;
        let average = report.tool("X").unwrap().average().unwrap();
        assert_eq!(average.duration, expected);
        assert_eq!(average.accuracy.sp_score, expected);
    }

    #[test]
    fn test_tool_without_datasets_has_no_average() {
        let mut report = BenchmarkReport::new(["PSAlign", "X"]);
        report.record("X", "d1", success(1.0, 1.0, 1.0)).unwrap();

        aggregate(&mut report);

        assert!(report.tool("PSAlign").unwrap().average().is_none());
        assert!(report.tool("X").unwrap().average().is_some());
    }

    #[test]
    fn test_failed_entries_excluded() {
        let mut report = BenchmarkReport::new(["X"]);
        report.record("X", "d1", success(1.0, 0.8, 0.4)).unwrap();
        report
            .record(
                "X",
                "d2",
                DatasetEntry::failed(&BenchError::ToolExecution("missing".to_string())),
            )
            .unwrap();

        aggregate(&mut report);

        let average = report.tool("X").unwrap().average().unwrap();
        assert_eq!(average.datasets, 1);
        assert_eq!(average.accuracy.sp_score, 0.8);
    }

    #[test]
    fn test_only_failures_has_no_average() {
        let mut report = BenchmarkReport::new(["X"]);
        report
            .record(
                "X",
                "d1",
                DatasetEntry::failed(&BenchError::ScorerOutput("short".to_string())),
            )
            .unwrap();

        aggregate(&mut report);

        assert!(report.tool("X").unwrap().average().is_none());
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let mut report = BenchmarkReport::new(["X"]);
        report.record("X", "d1", success(1.0, 1.0, 1.0)).unwrap();
        report.record("X", "d2", success(3.0, 0.5, 0.5)).unwrap();

        aggregate(&mut report);
        let once = report.clone();
        aggregate(&mut report);

        assert_eq!(report, once);
    }
}
