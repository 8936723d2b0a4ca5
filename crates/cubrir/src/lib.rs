//! Cubrir: coverage orchestration for Rust test suites
//!
//! Cubrir (Spanish: "to cover") drives an LLVM source-based coverage run
//! end to end: it removes stale artifacts, runs the test suite with
//! instrumentation enabled, merges the raw profiling fragments into a
//! single profile, renders an HTML report, cleans up the intermediates,
//! and opens the report in the default viewer.
//!
//! The instrumentation pass, the profile merge, and the report rendering
//! are performed by external tools (`cargo`, `llvm-profdata`, `llvm-cov`);
//! this crate owns only the sequencing, argument assembly, artifact
//! discovery, and cleanup around them.
//!
//! ```no_run
//! use cubrir::{CoverageConfig, CoverageOrchestrator};
//!
//! let config = CoverageConfig::new().with_open_report(false);
//! let summary = CoverageOrchestrator::new(config).run()?;
//! println!("report at {}", summary.entry_page.display());
//! # Ok::<(), cubrir::CoverageError>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod discover;
pub mod error;
pub mod exec;
pub mod orchestrator;
pub mod step;
pub mod viewer;

pub use config::{CoverageConfig, ObjectMode};
pub use error::{CoverageError, CoverageResult, Warning};
pub use exec::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};
pub use orchestrator::{CoverageOrchestrator, RunSummary};
pub use step::StepKind;
