//! Error types for coverage orchestration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for coverage operations
pub type CoverageResult<T> = Result<T, CoverageError>;

/// Errors that abort a coverage run
///
/// The first fatal error halts the pipeline; nothing downstream of it is
/// invoked and nothing is retried.
#[derive(Debug, Error)]
pub enum CoverageError {
    /// The instrumented test run exited non-zero
    #[error("test run failed{}: {stderr}", exit_suffix(.code))]
    TestRunFailed {
        /// Exit code of the test runner, if it exited normally
        code: Option<i32>,
        /// Tail of the runner's captured stderr
        stderr: String,
    },

    /// The test run produced no raw profiling fragments
    #[error("no profiling fragments found in {} (instrumentation did not activate)", .dir.display())]
    NoFragmentsProduced {
        /// Directory that was searched
        dir: PathBuf,
    },

    /// The profile-merge tool exited non-zero
    #[error("profile merge failed{}: {stderr}", exit_suffix(.code))]
    MergeFailed {
        /// Exit code of the merge tool, if it exited normally
        code: Option<i32>,
        /// Tail of the tool's captured stderr
        stderr: String,
    },

    /// No compiled test binaries matched the build glob
    #[error("no test binaries matched {pattern}")]
    NoBinariesFound {
        /// The glob pattern that was searched
        pattern: String,
    },

    /// The report renderer failed or produced no entry page
    #[error("report generation failed: {message}")]
    ReportGenerationFailed {
        /// What went wrong
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_suffix(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!(" (exit code {c})"),
        None => " (terminated by signal)".to_string(),
    }
}

impl CoverageError {
    /// Create a report-generation error
    #[must_use]
    pub fn report_generation(message: impl Into<String>) -> Self {
        Self::ReportGenerationFailed {
            message: message.into(),
        }
    }

    /// Process exit code for this failure kind
    ///
    /// 0 is success; 1 is reserved for I/O and invocation errors.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::TestRunFailed { .. } => 2,
            Self::NoFragmentsProduced { .. } => 3,
            Self::MergeFailed { .. } => 4,
            Self::NoBinariesFound { .. } => 5,
            Self::ReportGenerationFailed { .. } => 6,
            Self::Io(_) => 1,
        }
    }
}

/// Non-fatal conditions surfaced after the report exists
///
/// Warnings never affect the overall success signal; they are logged and
/// carried in the run summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Warning {
    /// An intermediate artifact could not be deleted
    Cleanup {
        /// Path that survived cleanup
        path: PathBuf,
        /// Underlying reason
        detail: String,
    },
    /// The report viewer could not be launched
    ViewerLaunch {
        /// Underlying reason
        detail: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cleanup { path, detail } => {
                write!(f, "could not remove {}: {detail}", path.display())
            }
            Self::ViewerLaunch { detail } => {
                write!(f, "could not open report viewer: {detail}")
            }
        }
    }
}
