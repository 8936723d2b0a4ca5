//! Coverage run configuration
//!
//! Every path and toolchain detail the pipeline touches is an explicit
//! field here; the orchestrator performs no ambient lookup beyond what
//! this structure names.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How discovered test binaries are handed to the report renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectMode {
    /// One object argument per discovered binary
    #[default]
    Explicit,
    /// The raw build glob passed through verbatim
    Wildcard,
}

/// Configuration for a coverage run
///
/// Relative paths are resolved against `working_dir`, which is also the
/// working directory of every spawned tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageConfig {
    /// Directory the instrumented run writes fragments into
    pub working_dir: PathBuf,
    /// Glob matching the compiled test binaries, relative to `working_dir`
    pub build_glob: String,
    /// Output directory for the HTML report
    pub report_dir: PathBuf,
    /// Source root passed to the renderer as a path filter
    pub source_root: PathBuf,
    /// Merged profile filename
    pub profile_path: PathBuf,
    /// Extension of raw fragment files (without the dot)
    pub fragment_extension: String,
    /// `LLVM_PROFILE_FILE` filename pattern for the instrumented run
    pub fragment_pattern: String,
    /// Test runner executable
    pub test_runner: PathBuf,
    /// Arguments passed to the test runner
    pub test_args: Vec<String>,
    /// Profile-merge tool executable
    pub profile_merger: PathBuf,
    /// Coverage-report tool executable
    pub report_renderer: PathBuf,
    /// Symbol demangler handed to the report tool
    pub demangler: PathBuf,
    /// Value of `RUSTFLAGS` enabling fragment emission
    pub instrument_flags: String,
    /// How binaries reach the report tool
    pub object_mode: ObjectMode,
    /// Open the entry page in the default viewer after a successful run
    pub open_report: bool,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            build_glob: "target/debug/deps/*".to_string(),
            report_dir: PathBuf::from("coverage"),
            source_root: PathBuf::from("src"),
            profile_path: PathBuf::from("cubrir.profdata"),
            fragment_extension: "profraw".to_string(),
            fragment_pattern: "cubrir-%p-%m.profraw".to_string(),
            test_runner: PathBuf::from("cargo"),
            test_args: vec!["test".to_string()],
            profile_merger: PathBuf::from("llvm-profdata"),
            report_renderer: PathBuf::from("llvm-cov"),
            demangler: PathBuf::from("rustfilt"),
            instrument_flags: "-C instrument-coverage".to_string(),
            object_mode: ObjectMode::Explicit,
            open_report: true,
        }
    }
}

impl CoverageConfig {
    /// Create a configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the working directory
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// Set the test-binary glob
    #[must_use]
    pub fn with_build_glob(mut self, pattern: impl Into<String>) -> Self {
        self.build_glob = pattern.into();
        self
    }

    /// Set the report output directory
    #[must_use]
    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = dir.into();
        self
    }

    /// Set the source root filter
    #[must_use]
    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_root = root.into();
        self
    }

    /// Set the merged profile filename
    #[must_use]
    pub fn with_profile_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.profile_path = path.into();
        self
    }

    /// Set the object-argument mode
    #[must_use]
    pub const fn with_object_mode(mut self, mode: ObjectMode) -> Self {
        self.object_mode = mode;
        self
    }

    /// Enable or disable the viewer launch
    #[must_use]
    pub const fn with_open_report(mut self, open: bool) -> Self {
        self.open_report = open;
        self
    }

    /// Merged profile location on disk
    #[must_use]
    pub fn profile_file(&self) -> PathBuf {
        self.working_dir.join(&self.profile_path)
    }

    /// Report directory location on disk
    #[must_use]
    pub fn report_root(&self) -> PathBuf {
        self.working_dir.join(&self.report_dir)
    }

    /// The report's entry page
    #[must_use]
    pub fn entry_page(&self) -> PathBuf {
        self.report_root().join("index.html")
    }

    /// Test-binary glob resolved against the working directory
    #[must_use]
    pub fn binary_glob(&self) -> String {
        resolve_pattern(&self.working_dir, &self.build_glob)
    }
}

fn resolve_pattern(base: &Path, pattern: &str) -> String {
    if Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        base.join(pattern).to_string_lossy().into_owned()
    }
}
