//! Error types for the CLI.

use std::fmt;
use std::path::PathBuf;

/// Errors from running a CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// The input file could not be read.
    ReadInput { path: PathBuf, details: String },
    /// The input file is not a workflow graph.
    ParseInput { path: PathBuf, details: String },
    /// Compilation failed.
    Compile { details: String },
    /// The compiled document could not be written.
    WriteOutput { path: PathBuf, details: String },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadInput { path, details } => {
                write!(f, "failed to read {}: {details}", path.display())
            }
            Self::ParseInput { path, details } => {
                write!(f, "{} is not a valid workflow graph: {details}", path.display())
            }
            Self::Compile { details } => write!(f, "compilation failed: {details}"),
            Self::WriteOutput { path, details } => {
                write!(f, "failed to write {}: {details}", path.display())
            }
        }
    }
}

impl std::error::Error for CliError {}
