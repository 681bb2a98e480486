use crate::core::config::{load_config, Config};
use crate::BenchError;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "msa-bench",
    version,
    about = "Benchmark multiple sequence alignment tools for runtime and accuracy",
    long_about = "Derives unaligned inputs from reference alignments, runs every configured \
                  aligner on every dataset, scores each estimate with FastSP and writes \
                  per-dataset results and per-tool averages to a JSON report. With no \
                  arguments the built-in directory layout (./source, ./unaligned, \
                  ./software, ./results) is used."
)]
pub struct Cli {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(short, long, env = "MSA_BENCH_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the default configuration to FILE and exit
    #[arg(long, value_name = "FILE")]
    pub write_default_config: Option<PathBuf>,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Resolve the configuration this invocation runs with
    pub fn load_config(&self) -> Result<Config, BenchError> {
        match &self.config {
            Some(path) => load_config(path),
            None => Ok(Config::default()),
        }
    }

    /// Log filter implied by `-v` flags
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
