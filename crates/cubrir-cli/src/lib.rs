//! Cubridor CLI library
//!
//! Command-line surface for the Cubrir coverage orchestrator.

#![warn(missing_docs)]

mod commands;
mod output;

pub use commands::{Cli, ColorArg, ObjectsArg};
pub use output::ProgressReporter;
