//! Built-in aligner catalogue and the template-driven tool adapter

use super::fastsp::FastSp;
use super::runner::{produced_output, run_timed, Invocation};
use super::traits::MsaTool;
use crate::benchmark::types::RunResult;
use crate::core::config::Config;
use crate::{BenchError, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File each tool writes its estimated alignment to, inside its scratch directory
pub const ESTIMATE_FILE: &str = "estimated_alignment";

/// Aligners known to the harness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlignerKind {
    MafftProgressive,
    MafftIterative,
    Prrn,
    TCoffee,
    PsAlign,
    Muscle,
}

impl AlignerKind {
    pub const ALL: [AlignerKind; 6] = [
        AlignerKind::MafftProgressive,
        AlignerKind::MafftIterative,
        AlignerKind::Prrn,
        AlignerKind::TCoffee,
        AlignerKind::PsAlign,
        AlignerKind::Muscle,
    ];

    /// Get the report name of the tool
    pub fn name(&self) -> &'static str {
        match self {
            AlignerKind::MafftProgressive => "mafft_prog",
            AlignerKind::MafftIterative => "mafft_iter",
            AlignerKind::Prrn => "PRRN",
            AlignerKind::TCoffee => "T-COFFEE",
            AlignerKind::PsAlign => "PSAlign",
            AlignerKind::Muscle => "MUSCLE",
        }
    }

    /// Get the display name of the tool
    pub fn display_name(&self) -> &'static str {
        match self {
            AlignerKind::MafftProgressive => "MAFFT (progressive, --retree 1)",
            AlignerKind::MafftIterative => "MAFFT (L-INS-i)",
            AlignerKind::Prrn => "PRRN",
            AlignerKind::TCoffee => "T-Coffee",
            AlignerKind::PsAlign => "PSAlign",
            AlignerKind::Muscle => "MUSCLE",
        }
    }

    /// Scratch directory name under the results directory
    pub fn results_subdir(&self) -> &'static str {
        match self {
            AlignerKind::MafftProgressive => "mafft_prog",
            AlignerKind::MafftIterative => "mafft_iter",
            AlignerKind::Prrn => "PRRN",
            AlignerKind::TCoffee => "T-Coffee",
            AlignerKind::PsAlign => "PSAlign",
            AlignerKind::Muscle => "muscle",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// Whether the harness knows how to invoke this tool
    pub fn is_runnable(&self) -> bool {
        !matches!(self, AlignerKind::PsAlign)
    }

    /// Invocation template relative to the software directory
    pub fn template(&self, software_dir: &Path) -> Option<InvocationTemplate> {
        let mafft = software_dir.join("mafft").join("scripts").join("mafft");
        let template = match self {
            AlignerKind::MafftProgressive => {
                InvocationTemplate::to_stdout(mafft, &["--retree", "1", INPUT])
            }
            AlignerKind::MafftIterative => InvocationTemplate::to_stdout(
                mafft,
                &["--localpair", "--maxiterate", "1000", INPUT],
            ),
            AlignerKind::Prrn => InvocationTemplate::to_stdout(
                software_dir.join("PRRN").join("bin").join("prrn"),
                &["-FN", INPUT],
            ),
            AlignerKind::TCoffee => InvocationTemplate::to_file(
                software_dir.join("T-coffee").join("bin").join("t_coffee"),
                &["-in", INPUT, "-output", "fasta_aln", "-outfile", OUTPUT],
            ),
            AlignerKind::Muscle => InvocationTemplate::to_file(
                software_dir.join("MUSCLE").join("muscle"),
                &["-in", INPUT, "-out", OUTPUT],
            ),
            AlignerKind::PsAlign => return None,
        };
        Some(template)
    }
}

impl std::fmt::Display for AlignerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for AlignerKind {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| BenchError::Config(format!("unknown tool '{}'", s)))
    }
}

/// Placeholder replaced by the unaligned input path
pub const INPUT: &str = "{input}";
/// Placeholder replaced by the estimated alignment path
pub const OUTPUT: &str = "{output}";

/// How to invoke one aligner: executable, fixed flags with `{input}` and
/// `{output}` placeholders, and where the alignment ends up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationTemplate {
    pub executable: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
    /// The tool prints its alignment to stdout rather than to `{output}`
    #[serde(default)]
    pub capture_stdout: bool,
}

impl InvocationTemplate {
    pub fn to_stdout(executable: PathBuf, args: &[&str]) -> Self {
        Self {
            executable,
            args: args.iter().map(|a| a.to_string()).collect(),
            capture_stdout: true,
        }
    }

    pub fn to_file(executable: PathBuf, args: &[&str]) -> Self {
        Self {
            executable,
            args: args.iter().map(|a| a.to_string()).collect(),
            capture_stdout: false,
        }
    }

    /// Substitute paths into the template
    pub fn render(&self, input: &Path, output: &Path) -> Invocation {
        let args = self.args.iter().map(|arg| substitute(arg, input, output));
        let invocation = Invocation::new(self.executable.clone()).args(args);
        if self.capture_stdout {
            invocation.stdout_to(output)
        } else {
            invocation
        }
    }
}

fn substitute(arg: &str, input: &Path, output: &Path) -> OsString {
    // Whole-argument placeholders keep non UTF-8 paths intact
    match arg {
        INPUT => input.as_os_str().to_os_string(),
        OUTPUT => output.as_os_str().to_os_string(),
        _ => arg
            .replace(INPUT, &input.to_string_lossy())
            .replace(OUTPUT, &output.to_string_lossy())
            .into(),
    }
}

/// Tool adapter that runs an aligner from its template and scores the result
pub struct TemplateTool {
    name: String,
    template: InvocationTemplate,
    work_dir: PathBuf,
    scorer: FastSp,
}

impl TemplateTool {
    pub fn new(
        name: impl Into<String>,
        template: InvocationTemplate,
        work_dir: PathBuf,
        scorer: FastSp,
    ) -> Self {
        Self {
            name: name.into(),
            template,
            work_dir,
            scorer,
        }
    }

    /// Adapter for a built-in aligner, `None` for tools without a template
    pub fn builtin(kind: AlignerKind, config: &Config) -> Option<Self> {
        let template = kind.template(&config.paths.software_dir)?;
        Some(Self::new(
            kind.name(),
            template,
            config.paths.results_dir.join(kind.results_subdir()),
            FastSp::from_config(config),
        ))
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn estimate_path(&self) -> PathBuf {
        self.work_dir.join(ESTIMATE_FILE)
    }

    pub fn template(&self) -> &InvocationTemplate {
        &self.template
    }
}

impl MsaTool for TemplateTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, reference: &Path, unaligned: &Path) -> Result<RunResult> {
        fs::create_dir_all(&self.work_dir)?;

        // A leftover estimate from the previous dataset must not be rescored
        let estimate = self.estimate_path();
        match fs::remove_file(&estimate) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }

        let invocation = self.template.render(unaligned, &estimate);
        let elapsed = run_timed(&invocation)?;

        if !produced_output(&estimate) {
            return Err(BenchError::ToolExecution(format!(
                "{} produced no alignment at {}",
                self.name,
                estimate.display()
            )));
        }

        let accuracy = self.scorer.score(reference, &estimate, &self.work_dir)?;
        debug!(tool = %self.name, seconds = elapsed.as_secs_f64(), "Run complete");

        Ok(RunResult {
            duration: elapsed.as_secs_f64(),
            accuracy,
        })
    }

    fn is_available(&self) -> bool {
        which::which(&self.template.executable).is_ok()
    }
}
