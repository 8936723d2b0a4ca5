//! Pipeline stages and command assembly
//!
//! Argument vectors for the three external invocations are built by pure
//! functions so the exact contract with each tool is testable without
//! executing anything.

use crate::config::{CoverageConfig, ObjectMode};
use crate::exec::CommandSpec;
use std::path::PathBuf;

/// The stages of a coverage run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Remove stale fragments and any previous merged profile
    Clean,
    /// Run the test suite with instrumentation enabled
    TestRun,
    /// Merge raw fragments into a single profile
    Merge,
    /// Render the HTML report
    Report,
    /// Remove this run's intermediates
    Cleanup,
    /// Open the report entry page
    Open,
}

impl StepKind {
    /// All stages in execution order
    pub const SEQUENCE: [Self; 6] = [
        Self::Clean,
        Self::TestRun,
        Self::Merge,
        Self::Report,
        Self::Cleanup,
        Self::Open,
    ];

    /// Human-readable progress label
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Clean => "removing stale coverage artifacts",
            Self::TestRun => "running instrumented tests",
            Self::Merge => "merging profile fragments",
            Self::Report => "rendering coverage report",
            Self::Cleanup => "removing intermediate artifacts",
            Self::Open => "opening report",
        }
    }
}

/// Command for the instrumented test run
///
/// `RUSTFLAGS` enables counter emission; `LLVM_PROFILE_FILE` pins fragment
/// placement to the working directory so discovery stays deterministic.
#[must_use]
pub fn test_run_command(config: &CoverageConfig) -> CommandSpec {
    let profile_file = config.working_dir.join(&config.fragment_pattern);
    CommandSpec::new(&config.test_runner, &config.working_dir)
        .args(config.test_args.iter().cloned())
        .env("RUSTFLAGS", &config.instrument_flags)
        .env("LLVM_PROFILE_FILE", profile_file)
}

/// Command merging `fragments` into the configured profile
#[must_use]
pub fn merge_command(config: &CoverageConfig, fragments: &[PathBuf]) -> CommandSpec {
    let mut spec = CommandSpec::new(&config.profile_merger, &config.working_dir)
        .arg("merge")
        .arg("-sparse");
    for fragment in fragments {
        spec = spec.arg(fragment.as_os_str());
    }
    spec.arg("-o").arg(config.profile_file())
}

/// Command rendering the HTML report from the merged profile
#[must_use]
pub fn report_command(config: &CoverageConfig, binaries: &[PathBuf]) -> CommandSpec {
    let mut spec = CommandSpec::new(&config.report_renderer, &config.working_dir)
        .arg("show")
        .arg(format!("-Xdemangler={}", config.demangler.display()));

    match config.object_mode {
        ObjectMode::Explicit => {
            let mut objects = binaries.iter();
            if let Some(first) = objects.next() {
                spec = spec.arg(first.as_os_str());
            }
            for object in objects {
                spec = spec.arg("-object").arg(object.as_os_str());
            }
        }
        ObjectMode::Wildcard => {
            spec = spec.arg(config.binary_glob());
        }
    }

    spec.arg(format!("-instr-profile={}", config.profile_file().display()))
        .arg("--show-line-counts-or-regions")
        .arg("--show-instantiations")
        .arg("--format=html")
        .arg(format!("--output-dir={}", config.report_root().display()))
        .arg(config.source_root.as_os_str())
}
