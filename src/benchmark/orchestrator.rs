//! Benchmark orchestration: prepare datasets, run every tool on every
//! dataset, aggregate, write the report.

use super::aggregate::aggregate;
use super::dataset::DatasetPreparer;
use super::types::{BenchmarkReport, DatasetEntry, AVERAGE_KEY};
use crate::core::config::Config;
use crate::report::write_report;
use crate::tools::aligners::{AlignerKind, TemplateTool};
use crate::tools::fastsp::FastSp;
use crate::tools::traits::MsaTool;
use crate::{BenchError, FailureKind, Result};
use std::fs;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Orchestrator lifecycle; transitions only move forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Idle,
    Preparing,
    Running,
    Aggregating,
    Writing,
    Done,
}

pub struct Orchestrator {
    config: Config,
    tools: Vec<Box<dyn MsaTool>>,
    known_tools: Vec<String>,
    phase: Phase,
}

impl Orchestrator {
    /// Build the tool set described by `config`
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let scorer = FastSp::from_config(&config);
        let mut tools: Vec<Box<dyn MsaTool>> = Vec::new();
        for name in &config.tools.enabled {
            // Custom definitions take precedence over the built-in template
            if let Some(custom) = config.tools.custom.iter().find(|c| &c.name == name) {
                tools.push(Box::new(TemplateTool::new(
                    custom.name.clone(),
                    custom.template.clone(),
                    config.paths.results_dir.join(&custom.name),
                    scorer.clone(),
                )));
            } else if let Some(tool) = AlignerKind::from_name(name)
                .and_then(|kind| TemplateTool::builtin(kind, &config))
            {
                tools.push(Box::new(tool));
            } else {
                return Err(BenchError::Config(format!("cannot build tool '{}'", name)));
            }
        }

        let mut known_tools: Vec<String> = AlignerKind::ALL
            .iter()
            .map(|kind| kind.name().to_string())
            .collect();
        for tool in &tools {
            if !known_tools.iter().any(|known| known == tool.name()) {
                known_tools.push(tool.name().to_string());
            }
        }

        Ok(Self {
            config,
            tools,
            known_tools,
            phase: Phase::Idle,
        })
    }

    /// Use an explicit tool set; the report lists exactly these tools
    pub fn with_tools(config: Config, tools: Vec<Box<dyn MsaTool>>) -> Self {
        let known_tools = tools.iter().map(|t| t.name().to_string()).collect();
        Self {
            config,
            tools,
            known_tools,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name())
    }

    fn enter(&mut self, phase: Phase) {
        debug_assert!(phase > self.phase, "phase {:?} after {:?}", phase, self.phase);
        info!(from = ?self.phase, to = ?phase, "Phase transition");
        self.phase = phase;
    }

    /// Run the whole benchmark and return the report that was written.
    ///
    /// A failing (tool, dataset) pair is recorded and the run continues.
    /// Dataset preparation and report writing failures abort the run.
    pub fn run(&mut self) -> Result<BenchmarkReport> {
        self.enter(Phase::Preparing);
        let report_path = self.config.paths.report_file();
        let report_dir = match report_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if let Err(e) = fs::create_dir_all(&self.config.paths.results_dir) {
            let results_dir = &self.config.paths.results_dir;
            if report_dir == *results_dir {
                return Err(BenchError::ReportWrite(format!(
                    "cannot create destination directory {}: {}",
                    results_dir.display(),
                    e
                )));
            }
            return Err(e.into());
        }
        if !report_dir.is_dir() {
            return Err(BenchError::ReportWrite(format!(
                "destination directory {} does not exist",
                report_dir.display()
            )));
        }

        let prepared = DatasetPreparer::from_config(&self.config.paths).prepare()?;
        if prepared.datasets.is_empty() {
            warn!(
                source_dir = %self.config.paths.source_dir.display(),
                "No usable datasets found"
            );
        }

        for tool in &self.tools {
            if !tool.is_available() {
                warn!(tool = tool.name(), "Executable not found, runs will be recorded as failures");
            }
        }

        self.enter(Phase::Running);
        let mut report = BenchmarkReport::new(self.known_tools.iter().cloned());

        // Unusable source files still show up, once per tool, as failed entries
        for failure in &prepared.failures {
            if failure.name == AVERAGE_KEY {
                warn!(
                    source = %failure.source.display(),
                    "Reserved dataset name, not listed in the report"
                );
                continue;
            }
            for tool in &self.tools {
                let entry = DatasetEntry::Failed {
                    kind: FailureKind::DatasetPreparation,
                    message: failure.reason.clone(),
                };
                report.record(tool.name(), failure.name.clone(), entry)?;
            }
        }

        let total = prepared.datasets.len();
        for (index, dataset) in prepared.datasets.iter().enumerate() {
            info!(dataset = %dataset.name, progress = %format!("{}/{}", index + 1, total), "Benchmarking dataset");

            for tool in &self.tools {
                let entry = match tool.run(&dataset.reference_path, &dataset.unaligned_path) {
                    Ok(result) => {
                        info!(
                            tool = tool.name(),
                            dataset = %dataset.name,
                            duration = result.duration,
                            sp_score = result.accuracy.sp_score,
                            tc = result.accuracy.tc,
                            "Run succeeded"
                        );
                        DatasetEntry::Success(result)
                    }
                    Err(e) => {
                        error!(tool = tool.name(), dataset = %dataset.name, error = %e, "Run failed");
                        DatasetEntry::failed(&e)
                    }
                };
                report.record(tool.name(), dataset.name.clone(), entry)?;
            }
        }

        self.enter(Phase::Aggregating);
        aggregate(&mut report);
        for (tool, results) in report.tools() {
            if let Some(average) = results.average() {
                info!(
                    tool = %tool,
                    datasets = average.datasets,
                    failed = results.failures().count(),
                    duration = average.duration,
                    sp_score = average.accuracy.sp_score,
                    "Tool summary"
                );
            }
        }

        self.enter(Phase::Writing);
        write_report(&report, &report_path)?;

        self.enter(Phase::Done);
        Ok(report)
    }
}
