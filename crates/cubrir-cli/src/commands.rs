//! CLI definition using clap

use clap::{Parser, ValueEnum};
use cubrir::{CoverageConfig, ObjectMode};
use std::path::PathBuf;

/// Cubridor: one-shot LLVM coverage reports for Rust test suites
///
/// Runs the test suite with instrumentation enabled, merges the raw
/// profiling fragments, renders an HTML report, and opens it.
#[derive(Parser, Debug)]
#[command(name = "cubridor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorArg,

    /// Directory the instrumented run writes fragments into
    #[arg(long, default_value = ".")]
    pub working_dir: PathBuf,

    /// Glob matching the compiled test binaries
    #[arg(long, default_value = "target/debug/deps/*")]
    pub build_glob: String,

    /// Output directory for the HTML report
    #[arg(short = 'o', long, default_value = "coverage")]
    pub report_dir: PathBuf,

    /// Source root passed to the report tool as a path filter
    #[arg(long, default_value = "src")]
    pub source_root: PathBuf,

    /// Merged profile filename
    #[arg(long, default_value = "cubrir.profdata")]
    pub profile: PathBuf,

    /// Test runner executable
    #[arg(long, default_value = "cargo")]
    pub cargo: PathBuf,

    /// Profile-merge tool executable
    #[arg(long, default_value = "llvm-profdata")]
    pub llvm_profdata: PathBuf,

    /// Coverage-report tool executable
    #[arg(long, default_value = "llvm-cov")]
    pub llvm_cov: PathBuf,

    /// Symbol demangler handed to the report tool
    #[arg(long, default_value = "rustfilt")]
    pub demangler: PathBuf,

    /// How test binaries are passed to the report tool
    #[arg(long, value_enum, default_value = "explicit")]
    pub objects: ObjectsArg,

    /// Do not open the report in the default viewer
    #[arg(long)]
    pub no_open: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Build the engine configuration from the parsed arguments
    #[must_use]
    pub fn coverage_config(&self) -> CoverageConfig {
        let mut config = CoverageConfig::new()
            .with_working_dir(&self.working_dir)
            .with_build_glob(&self.build_glob)
            .with_report_dir(&self.report_dir)
            .with_source_root(&self.source_root)
            .with_profile_path(&self.profile)
            .with_object_mode(self.objects.into())
            .with_open_report(!self.no_open);
        config.test_runner.clone_from(&self.cargo);
        config.profile_merger.clone_from(&self.llvm_profdata);
        config.report_renderer.clone_from(&self.llvm_cov);
        config.demangler.clone_from(&self.demangler);
        config
    }
}

/// Object-argument mode for the report tool
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ObjectsArg {
    /// One object argument per discovered binary
    #[default]
    Explicit,
    /// Pass the build glob through verbatim
    Wildcard,
}

impl From<ObjectsArg> for ObjectMode {
    fn from(arg: ObjectsArg) -> Self {
        match arg {
            ObjectsArg::Explicit => Self::Explicit,
            ObjectsArg::Wildcard => Self::Wildcard,
        }
    }
}

/// Color output choice
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl ColorArg {
    /// Whether output should be colored
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stdout()),
        }
    }
}
