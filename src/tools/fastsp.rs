//! FastSP accuracy scorer integration

use super::runner::{run_timed, Invocation};
use crate::benchmark::types::AccuracyRecord;
use crate::core::config::Config;
use crate::BenchError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Minimum number of lines a usable scorer report has
pub const MIN_SCORER_LINES: usize = 6;

/// Line offsets of each metric in the scorer report
const METRIC_LINES: [(usize, &str); 5] = [
    (0, "SP_score"),
    (1, "Modeler"),
    (2, "SPFN"),
    (3, "SPFP"),
    (5, "TC"),
];

/// Scores an estimated alignment against its reference by running FastSP
#[derive(Debug, Clone)]
pub struct FastSp {
    program: PathBuf,
    args: Vec<String>,
    output_name: String,
}

impl FastSp {
    pub fn new<P: Into<PathBuf>>(program: P, args: Vec<String>, output_name: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args,
            output_name: output_name.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.scorer.program.clone(),
            config.scorer_args(),
            config.scorer.output_name.clone(),
        )
    }

    /// Run the scorer and parse its report, which is kept in `work_dir`
    pub fn score(
        &self,
        reference: &Path,
        estimate: &Path,
        work_dir: &Path,
    ) -> Result<AccuracyRecord, BenchError> {
        let results_path = work_dir.join(&self.output_name);
        let invocation = Invocation::new(&self.program)
            .args(&self.args)
            .arg("-r")
            .arg(reference)
            .arg("-e")
            .arg(estimate)
            .stdout_to(&results_path);

        run_timed(&invocation)?;

        let text = fs::read_to_string(&results_path).map_err(|e| {
            BenchError::ScorerOutput(format!(
                "cannot read scorer report {}: {}",
                results_path.display(),
                e
            ))
        })?;
        let record = parse_scorer_output(&text)?;
        debug!(estimate = %estimate.display(), ?record, "Scored");
        Ok(record)
    }
}

/// Parse a FastSP report into an [`AccuracyRecord`].
///
/// The report must have at least six lines; lines 0, 1, 2, 3 and 5 each hold
/// `<label> <value>` and the trailing value is taken as the metric.
pub fn parse_scorer_output(text: &str) -> Result<AccuracyRecord, BenchError> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < MIN_SCORER_LINES {
        return Err(BenchError::ScorerOutput(format!(
            "expected at least {} lines, got {}",
            MIN_SCORER_LINES,
            lines.len()
        )));
    }

    let mut values = [0.0f64; 5];
    for (slot, &(line_index, field)) in values.iter_mut().zip(METRIC_LINES.iter()) {
        *slot = parse_metric(lines[line_index], line_index, field)?;
    }

    Ok(AccuracyRecord {
        sp_score: values[0],
        modeler: values[1],
        spfn: values[2],
        spfp: values[3],
        tc: values[4],
    })
}

fn parse_metric(line: &str, line_index: usize, field: &str) -> Result<f64, BenchError> {
    let mut tokens = line.split_whitespace();
    let (Some(_label), Some(raw)) = (tokens.next(), tokens.next_back()) else {
        return Err(BenchError::ScorerOutput(format!(
            "line {} ({}): expected '<label> <value>', got '{}'",
            line_index + 1,
            field,
            line
        )));
    };

    let value: f64 = raw.parse().map_err(|_| {
        BenchError::ScorerOutput(format!(
            "line {} ({}): '{}' is not a number",
            line_index + 1,
            field,
            raw
        ))
    })?;

    if !value.is_finite() {
        return Err(BenchError::ScorerOutput(format!(
            "line {} ({}): '{}' is not a finite number",
            line_index + 1,
            field,
            raw
        )));
    }

    Ok(value)
}
