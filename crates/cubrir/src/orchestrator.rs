//! The sequential pipeline driver
//!
//! One run is a strict linear sequence: clean, instrumented test run, merge,
//! report, cleanup, viewer launch. The first fatal failure halts the run;
//! everything after the report exists is best-effort.

use crate::config::CoverageConfig;
use crate::discover;
use crate::error::{CoverageError, CoverageResult, Warning};
use crate::exec::{CommandRunner, SystemRunner};
use crate::step::{self, StepKind};
use crate::viewer;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// How much captured stderr a failure carries for diagnosis
const STDERR_TAIL_LINES: usize = 20;

/// Outcome of a successful coverage run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Raw fragments merged into the profile
    pub fragments: usize,
    /// Test binaries referenced by the report
    pub binaries: usize,
    /// The report's entry page
    pub entry_page: PathBuf,
    /// Non-fatal conditions encountered after the report existed
    pub warnings: Vec<Warning>,
    /// Wall-clock duration of the run
    pub duration: Duration,
}

/// Drives the coverage pipeline over an injected command runner
#[derive(Debug)]
pub struct CoverageOrchestrator<R = SystemRunner> {
    config: CoverageConfig,
    runner: R,
}

impl CoverageOrchestrator<SystemRunner> {
    /// Create an orchestrator backed by the system toolchain
    #[must_use]
    pub fn new(config: CoverageConfig) -> Self {
        Self::with_runner(config, SystemRunner)
    }
}

impl<R: CommandRunner> CoverageOrchestrator<R> {
    /// Create an orchestrator with an explicit runner
    #[must_use]
    pub fn with_runner(config: CoverageConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// The configuration this orchestrator runs with
    #[must_use]
    pub const fn config(&self) -> &CoverageConfig {
        &self.config
    }

    /// Execute the full pipeline
    pub fn run(&self) -> CoverageResult<RunSummary> {
        self.run_with(&mut |_| {})
    }

    /// Execute the full pipeline, reporting each stage to `observe`
    pub fn run_with(&self, observe: &mut dyn FnMut(StepKind)) -> CoverageResult<RunSummary> {
        let started = Instant::now();

        observe(StepKind::Clean);
        self.purge_intermediates()?;

        observe(StepKind::TestRun);
        self.run_tests()?;
        let fragments = self.discover_fragments()?;

        observe(StepKind::Merge);
        self.merge_fragments(&fragments)?;

        observe(StepKind::Report);
        let binaries = self.discover_binaries()?;
        self.render_report(&binaries)?;

        // The report is the valuable artifact; from here on nothing fails the run.
        observe(StepKind::Cleanup);
        let mut warnings = Vec::new();
        self.remove_intermediates(&fragments, &mut warnings);

        observe(StepKind::Open);
        if self.config.open_report {
            self.launch_viewer(&mut warnings);
        }

        Ok(RunSummary {
            fragments: fragments.len(),
            binaries: binaries.len(),
            entry_page: self.config.entry_page(),
            warnings,
            duration: started.elapsed(),
        })
    }

    /// Delete leftovers from previous runs
    ///
    /// A stale fragment surviving into the merge would silently mix runs, so
    /// a deletion failure here is fatal. Missing files are fine.
    fn purge_intermediates(&self) -> CoverageResult<()> {
        let stale =
            discover::find_fragments(&self.config.working_dir, &self.config.fragment_extension)?;
        for fragment in &stale {
            remove_existing(fragment)?;
        }
        remove_existing(&self.config.profile_file())?;
        Ok(())
    }

    fn run_tests(&self) -> CoverageResult<()> {
        let output = self.runner.run(&step::test_run_command(&self.config))?;
        if output.success() {
            Ok(())
        } else {
            // Fragments from the failed attempt stay on disk for inspection.
            Err(CoverageError::TestRunFailed {
                code: output.code,
                stderr: output.stderr_tail(STDERR_TAIL_LINES),
            })
        }
    }

    fn discover_fragments(&self) -> CoverageResult<Vec<PathBuf>> {
        let fragments =
            discover::find_fragments(&self.config.working_dir, &self.config.fragment_extension)?;
        if fragments.is_empty() {
            return Err(CoverageError::NoFragmentsProduced {
                dir: self.config.working_dir.clone(),
            });
        }
        tracing::debug!(count = fragments.len(), "discovered profiling fragments");
        Ok(fragments)
    }

    fn merge_fragments(&self, fragments: &[PathBuf]) -> CoverageResult<()> {
        let output = self
            .runner
            .run(&step::merge_command(&self.config, fragments))?;
        if output.success() {
            Ok(())
        } else {
            Err(CoverageError::MergeFailed {
                code: output.code,
                stderr: output.stderr_tail(STDERR_TAIL_LINES),
            })
        }
    }

    fn discover_binaries(&self) -> CoverageResult<Vec<PathBuf>> {
        let pattern = self.config.binary_glob();
        let binaries = discover::find_test_binaries(&pattern)?;
        if binaries.is_empty() {
            return Err(CoverageError::NoBinariesFound { pattern });
        }
        tracing::debug!(count = binaries.len(), "discovered test binaries");
        Ok(binaries)
    }

    fn render_report(&self, binaries: &[PathBuf]) -> CoverageResult<()> {
        let output = self
            .runner
            .run(&step::report_command(&self.config, binaries))?;
        if !output.success() {
            let exit = match output.code {
                Some(c) => format!("exit code {c}"),
                None => "signal termination".to_string(),
            };
            return Err(CoverageError::report_generation(format!(
                "renderer failed with {exit}: {}",
                output.stderr_tail(STDERR_TAIL_LINES)
            )));
        }

        let entry = self.config.entry_page();
        if entry.is_file() {
            Ok(())
        } else {
            Err(CoverageError::report_generation(format!(
                "renderer exited successfully but {} is missing",
                entry.display()
            )))
        }
    }

    fn remove_intermediates(&self, fragments: &[PathBuf], warnings: &mut Vec<Warning>) {
        let mut targets = fragments.to_vec();
        targets.push(self.config.profile_file());

        for path in targets {
            if let Err(e) = remove_existing(&path) {
                tracing::warn!(path = %path.display(), error = %e, "cleanup failed");
                warnings.push(Warning::Cleanup {
                    path,
                    detail: e.to_string(),
                });
            }
        }
    }

    fn launch_viewer(&self, warnings: &mut Vec<Warning>) {
        let spec = viewer::open_command(&self.config.entry_page(), &self.config.working_dir);
        if let Err(e) = self.runner.spawn(&spec) {
            tracing::warn!(error = %e, "viewer launch failed");
            warnings.push(Warning::ViewerLaunch {
                detail: e.to_string(),
            });
        }
    }
}

/// Remove a file, tolerating its absence
fn remove_existing(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
