//! Error types for the workflow crate.
//!
//! The builder rejects mistakes eagerly, at the call that makes them. Graphs
//! that reach the compiler by other routes (deserialised files) are checked
//! by the compiler's validator instead.

use std::fmt;

/// Errors from constructing a workflow graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// A node with this name was already added.
    DuplicateNode { name: String },
    /// A connection names a node that was never added.
    UnknownNode { name: String },
}

impl fmt::Display for BuilderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNode { name } => {
                write!(
                    f,
                    "node name '{name}' is duplicate; each node must have a unique name within the workflow"
                )
            }
            Self::UnknownNode { name } => {
                write!(f, "unknown node '{name}': it does not exist in the workflow")
            }
        }
    }
}

impl std::error::Error for BuilderError {}
