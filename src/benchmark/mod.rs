//! Benchmark pipeline: datasets, per-run results, aggregation and orchestration

pub mod aggregate;
pub mod dataset;
pub mod orchestrator;
pub mod types;

pub use aggregate::aggregate;
pub use dataset::{Dataset, DatasetPreparer, PreparedDatasets};
pub use orchestrator::{Orchestrator, Phase};
pub use types::{
    AccuracyRecord, AverageEntry, BenchmarkReport, DatasetEntry, RunResult, ToolReport,
    AVERAGE_KEY,
};
