//! Configuration types for msa-bench

use crate::benchmark::types::AVERAGE_KEY;
use crate::tools::aligners::{AlignerKind, InvocationTemplate, ESTIMATE_FILE};
use crate::BenchError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub scorer: ScorerConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Aligned reference datasets
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    /// Derived unaligned inputs, reused across runs
    #[serde(default = "default_unaligned_dir")]
    pub unaligned_dir: PathBuf,
    /// Root of the installed aligner binaries
    #[serde(default = "default_software_dir")]
    pub software_dir: PathBuf,
    /// Per-tool scratch directories live under here
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    /// Final report; defaults to `<results_dir>/Benchmark_results.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    #[serde(default = "default_scorer_program")]
    pub program: PathBuf,
    /// Leading arguments; defaults to `-jar <software_dir>/FastSP/FastSP.jar`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    /// File (inside the tool's scratch directory) receiving the scorer's stdout
    #[serde(default = "default_scorer_output_name")]
    pub output_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Report names of the tools to run
    #[serde(default = "default_enabled_tools")]
    pub enabled: Vec<String>,
    /// Extra tools described entirely by their invocation template
    #[serde(default)]
    pub custom: Vec<CustomToolConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomToolConfig {
    pub name: String,
    #[serde(flatten)]
    pub template: InvocationTemplate,
}

// Default value functions
fn default_source_dir() -> PathBuf { PathBuf::from("./source/") }
fn default_unaligned_dir() -> PathBuf { PathBuf::from("./unaligned/") }
fn default_software_dir() -> PathBuf { PathBuf::from("./software/") }
fn default_results_dir() -> PathBuf { PathBuf::from("./results/") }
fn default_scorer_program() -> PathBuf { PathBuf::from("java") }
fn default_scorer_output_name() -> String { "fastSP_results".to_string() }
fn default_enabled_tools() -> Vec<String> {
    AlignerKind::ALL
        .iter()
        .filter(|kind| kind.is_runnable())
        .map(|kind| kind.name().to_string())
        .collect()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            unaligned_dir: default_unaligned_dir(),
            software_dir: default_software_dir(),
            results_dir: default_results_dir(),
            report_file: None,
        }
    }
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            program: default_scorer_program(),
            args: None,
            output_name: default_scorer_output_name(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_tools(),
            custom: Vec::new(),
        }
    }
}

impl PathsConfig {
    pub fn report_file(&self) -> PathBuf {
        self.report_file
            .clone()
            .unwrap_or_else(|| self.results_dir.join("Benchmark_results.json"))
    }
}

impl Config {
    /// Scorer arguments placed before `-r <reference> -e <estimate>`
    pub fn scorer_args(&self) -> Vec<String> {
        match &self.scorer.args {
            Some(args) => args.clone(),
            None => vec![
                "-jar".to_string(),
                self.paths
                    .software_dir
                    .join("FastSP")
                    .join("FastSP.jar")
                    .to_string_lossy()
                    .into_owned(),
            ],
        }
    }

    /// Reject configurations that cannot produce a meaningful run
    pub fn validate(&self) -> Result<(), BenchError> {
        let output_name = &self.scorer.output_name;
        if !is_plain_file_name(output_name) {
            return Err(BenchError::Config(format!(
                "scorer.output_name '{}' must be a plain file name",
                output_name
            )));
        }
        if output_name == ESTIMATE_FILE {
            return Err(BenchError::Config(format!(
                "scorer.output_name must not be '{}', the aligners write their estimate there",
                ESTIMATE_FILE
            )));
        }

        let mut custom_names: Vec<&str> = Vec::new();
        for custom in &self.tools.custom {
            if !is_plain_file_name(&custom.name) {
                return Err(BenchError::Config(format!(
                    "custom tool name '{}' must be a plain file name",
                    custom.name
                )));
            }
            if custom.name == AVERAGE_KEY {
                return Err(BenchError::Config(format!(
                    "tool name '{}' is reserved",
                    custom.name
                )));
            }
            if custom_names.contains(&custom.name.as_str()) {
                return Err(BenchError::Config(format!(
                    "custom tool '{}' is defined more than once",
                    custom.name
                )));
            }
            custom_names.push(&custom.name);
        }

        let mut report_names: Vec<String> = Vec::new();
        let mut work_dirs: Vec<String> = Vec::new();
        for name in &self.tools.enabled {
            let (report_name, work_dir) = self.resolve_tool(name)?;
            if report_names.contains(&report_name) {
                return Err(BenchError::Config(format!(
                    "tool '{}' is enabled more than once",
                    report_name
                )));
            }
            // Compared without case so the check also holds on case-insensitive filesystems
            if work_dirs.iter().any(|dir| dir.eq_ignore_ascii_case(&work_dir)) {
                return Err(BenchError::Config(format!(
                    "tool '{}' would share the scratch directory '{}' with another tool",
                    report_name, work_dir
                )));
            }
            report_names.push(report_name);
            work_dirs.push(work_dir);
        }

        Ok(())
    }

    /// Report name and scratch subdirectory of an enabled tool.
    ///
    /// A custom definition takes precedence over the built-in of the same name.
    fn resolve_tool(&self, name: &str) -> Result<(String, String), BenchError> {
        if let Some(custom) = self.tools.custom.iter().find(|c| c.name == name) {
            return Ok((custom.name.clone(), custom.name.clone()));
        }
        match AlignerKind::from_name(name) {
            Some(kind) if kind.is_runnable() => {
                Ok((kind.name().to_string(), kind.results_subdir().to_string()))
            }
            Some(_) => Err(BenchError::Config(format!(
                "tool '{}' has no invocation template",
                name
            ))),
            None => Err(BenchError::Config(format!("unknown tool '{}'", name))),
        }
    }
}

/// Non-empty, no path separators, not `.` or `..`
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, BenchError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| BenchError::Config(format!("Failed to parse config: {}", e)))?;
    config.validate()?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), BenchError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| BenchError::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
