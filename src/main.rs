use clap::Parser;
use colored::*;
use msa_bench::cli::Cli;
use msa_bench::core::config::save_config;
use msa_bench::{BenchError, Orchestrator};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Initialize logging with MSA_BENCH_LOG environment variable support
    let log_level =
        std::env::var("MSA_BENCH_LOG").unwrap_or_else(|_| cli.log_level().to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        // Use appropriate exit codes based on error type
        let exit_code = match e.downcast_ref::<BenchError>() {
            Some(BenchError::Config(_)) => 2,
            Some(BenchError::Io(_)) => 3,
            Some(BenchError::DatasetPreparation(_)) => 4,
            Some(BenchError::ReportWrite(_)) => 5,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(ref path) = cli.write_default_config {
        save_config(path, &msa_bench::core::config::default_config())?;
        eprintln!("Default configuration written to {}", path.display());
        return Ok(());
    }

    let config = cli.load_config()?;
    let report_path = config.paths.report_file();

    let mut orchestrator = Orchestrator::new(config)?;
    let report = orchestrator.run()?;

    let failed: usize = report
        .tools()
        .map(|(_, results)| results.failures().count())
        .sum();
    if failed > 0 {
        eprintln!(
            "{} {} run(s) failed, see {}",
            "Warning:".yellow().bold(),
            failed,
            report_path.display()
        );
    }
    eprintln!("{} {}", "Report written to".green(), report_path.display());

    Ok(())
}
