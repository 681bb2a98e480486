//! Result data model shared by the tool adapters, aggregator and report writer

use crate::{BenchError, FailureKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key of the synthesized per-tool average; never a dataset name
pub const AVERAGE_KEY: &str = "average";

/// Accuracy metrics reported by the scorer for one estimated alignment
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AccuracyRecord {
    #[serde(rename = "SP_score")]
    pub sp_score: f64,
    #[serde(rename = "Modeler")]
    pub modeler: f64,
    #[serde(rename = "SPFN")]
    pub spfn: f64,
    #[serde(rename = "SPFP")]
    pub spfp: f64,
    #[serde(rename = "TC")]
    pub tc: f64,
}

/// Outcome of one successful (tool, dataset) run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Wall-clock seconds spent in the aligner
    pub duration: f64,
    pub accuracy: AccuracyRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DatasetEntry {
    #[serde(rename = "ok")]
    Success(RunResult),
    Failed { kind: FailureKind, message: String },
}

impl DatasetEntry {
    pub fn failed(error: &BenchError) -> Self {
        DatasetEntry::Failed {
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    pub fn as_success(&self) -> Option<&RunResult> {
        match self {
            DatasetEntry::Success(result) => Some(result),
            DatasetEntry::Failed { .. } => None,
        }
    }
}

/// Arithmetic means over every successful dataset of one tool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AverageEntry {
    /// Number of successful datasets the means were taken over
    pub datasets: usize,
    pub duration: f64,
    pub accuracy: AccuracyRecord,
}

/// Per-dataset results of one tool plus its average.
///
/// Persisted as a single flat mapping where the average sits under
/// [`AVERAGE_KEY`] next to the dataset names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawToolReport", into = "RawToolReport")]
pub struct ToolReport {
    datasets: BTreeMap<String, DatasetEntry>,
    average: Option<AverageEntry>,
}

impl ToolReport {
    pub fn record(&mut self, dataset: impl Into<String>, entry: DatasetEntry) -> Result<(), BenchError> {
        let dataset = dataset.into();
        if dataset == AVERAGE_KEY {
            return Err(BenchError::DatasetPreparation(format!(
                "dataset name '{}' is reserved",
                AVERAGE_KEY
            )));
        }
        self.datasets.insert(dataset, entry);
        Ok(())
    }

    pub fn datasets(&self) -> &BTreeMap<String, DatasetEntry> {
        &self.datasets
    }

    pub fn get(&self, dataset: &str) -> Option<&DatasetEntry> {
        self.datasets.get(dataset)
    }

    pub fn successes(&self) -> impl Iterator<Item = (&String, &RunResult)> {
        self.datasets
            .iter()
            .filter_map(|(name, entry)| entry.as_success().map(|result| (name, result)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&String, &DatasetEntry)> {
        self.datasets
            .iter()
            .filter(|(_, entry)| entry.as_success().is_none())
    }

    pub fn average(&self) -> Option<&AverageEntry> {
        self.average.as_ref()
    }

    pub(crate) fn set_average(&mut self, average: Option<AverageEntry>) {
        self.average = average;
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ReportValue {
    Entry(DatasetEntry),
    Average(AverageEntry),
}

#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct RawToolReport(BTreeMap<String, ReportValue>);

impl From<ToolReport> for RawToolReport {
    fn from(report: ToolReport) -> Self {
        let mut raw: BTreeMap<String, ReportValue> = report
            .datasets
            .into_iter()
            .map(|(name, entry)| (name, ReportValue::Entry(entry)))
            .collect();
        if let Some(average) = report.average {
            raw.insert(AVERAGE_KEY.to_string(), ReportValue::Average(average));
        }
        RawToolReport(raw)
    }
}

impl TryFrom<RawToolReport> for ToolReport {
    type Error = String;

    fn try_from(raw: RawToolReport) -> Result<Self, Self::Error> {
        let mut report = ToolReport::default();
        for (name, value) in raw.0 {
            match (name.as_str() == AVERAGE_KEY, value) {
                (true, ReportValue::Average(average)) => report.average = Some(average),
                (false, ReportValue::Entry(entry)) => {
                    report.datasets.insert(name, entry);
                }
                (true, ReportValue::Entry(_)) => {
                    return Err(format!("'{}' must hold an average entry", AVERAGE_KEY))
                }
                (false, ReportValue::Average(_)) => {
                    return Err(format!("dataset '{}' holds an average entry", name))
                }
            }
        }
        Ok(report)
    }
}

/// Results of every tool, keyed by tool name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BenchmarkReport {
    tools: BTreeMap<String, ToolReport>,
}

impl BenchmarkReport {
    /// Create a report with an empty entry for every known tool
    pub fn new<I, S>(tool_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tools: tool_names
                .into_iter()
                .map(|name| (name.into(), ToolReport::default()))
                .collect(),
        }
    }

    pub fn record(
        &mut self,
        tool: &str,
        dataset: impl Into<String>,
        entry: DatasetEntry,
    ) -> Result<(), BenchError> {
        self.tools
            .entry(tool.to_string())
            .or_default()
            .record(dataset, entry)
    }

    pub fn tool(&self, name: &str) -> Option<&ToolReport> {
        self.tools.get(name)
    }

    pub fn tools(&self) -> impl Iterator<Item = (&String, &ToolReport)> {
        self.tools.iter()
    }

    pub(crate) fn tools_mut(&mut self) -> impl Iterator<Item = (&String, &mut ToolReport)> {
        self.tools.iter_mut()
    }
}
