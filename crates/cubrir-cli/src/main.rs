//! Cubridor: one-command LLVM coverage reports for Rust test suites
//!
//! ## Usage
//!
//! ```bash
//! cubridor                       # test, merge, render, open coverage/index.html
//! cubridor --no-open             # leave the report closed
//! cubridor --objects wildcard    # pass the build glob to llvm-cov verbatim
//! cubridor --json                # print the run summary as JSON
//! ```

use clap::Parser;
use cubridor::{Cli, ProgressReporter};
use cubrir::{CoverageError, CoverageOrchestrator, StepKind};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), CoverageError> {
    let config = cli.coverage_config();
    let mut reporter = ProgressReporter::new(cli.color.should_color(), cli.quiet);

    let orchestrator = CoverageOrchestrator::new(config);
    reporter.start(StepKind::SEQUENCE.len() as u64);
    let result = orchestrator.run_with(&mut |step| reporter.step(step.describe()));
    reporter.finish();

    let summary = result?;

    for warning in &summary.warnings {
        reporter.warning(&warning.to_string());
    }

    if cli.json {
        println!("{}", render_summary_json(&summary)?);
    } else {
        reporter.success(&format!(
            "coverage report at {} ({} fragments, {} binaries)",
            summary.entry_page.display(),
            summary.fragments,
            summary.binaries,
        ));
    }

    Ok(())
}

fn render_summary_json(summary: &cubrir::RunSummary) -> Result<String, CoverageError> {
    serde_json::to_string_pretty(summary).map_err(|e| {
        CoverageError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
