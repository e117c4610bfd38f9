//! Error types for the schema crate.

use std::fmt;
use std::path::PathBuf;

/// Errors from reading or writing schema records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The cache directory could not be listed.
    ReadDirectory { path: PathBuf, details: String },
    /// A schema file could not be read.
    ReadFile { path: PathBuf, details: String },
    /// A schema file did not contain a valid schema record.
    Parse { path: PathBuf, details: String },
    /// A schema file could not be written.
    Write { path: PathBuf, details: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadDirectory { path, details } => {
                write!(f, "failed to list schema directory {}: {details}", path.display())
            }
            Self::ReadFile { path, details } => {
                write!(f, "failed to read schema file {}: {details}", path.display())
            }
            Self::Parse { path, details } => {
                write!(f, "invalid schema in {}: {details}", path.display())
            }
            Self::Write { path, details } => {
                write!(f, "failed to write schema file {}: {details}", path.display())
            }
        }
    }
}

impl std::error::Error for SchemaError {}
