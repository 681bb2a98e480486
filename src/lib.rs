pub mod benchmark;
pub mod bio;
pub mod cli;
pub mod core;
pub mod report;
pub mod tools;

pub use crate::benchmark::orchestrator::Orchestrator;
pub use crate::core::config::Config;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset preparation failed: {0}")]
    DatasetPreparation(String),

    #[error("Tool execution failed: {0}")]
    ToolExecution(String),

    #[error("Malformed scorer output: {0}")]
    ScorerOutput(String),

    #[error("Report write failed: {0}")]
    ReportWrite(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl BenchError {
    /// Classification recorded against a failed (tool, dataset) entry
    pub fn kind(&self) -> FailureKind {
        match self {
            BenchError::DatasetPreparation(_) => FailureKind::DatasetPreparation,
            BenchError::ToolExecution(_) => FailureKind::ToolExecution,
            BenchError::ScorerOutput(_) => FailureKind::ScorerOutput,
            BenchError::Io(_) => FailureKind::Io,
            _ => FailureKind::Other,
        }
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        BenchError::Serialization(err.to_string())
    }
}

/// Why a (tool, dataset) pair did not produce a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    DatasetPreparation,
    ToolExecution,
    ScorerOutput,
    Io,
    Other,
}

pub type Result<T> = std::result::Result<T, BenchError>;
