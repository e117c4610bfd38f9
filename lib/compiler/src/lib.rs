//! Workflow compiler for flowpress.
//!
//! This crate turns a [`WorkflowGraph`](flowpress_workflow::WorkflowGraph)
//! into the JSON document the automation platform imports:
//!
//! - **Validation**: structural checks reported as data, never as panics
//! - **Registry**: node-type versions loaded once per process from a schema source
//! - **Layout**: canvas positions from the graph's topology
//! - **Reshape**: flat connections nested by source, type and output branch
//! - **Compiler**: the async pipeline that sequences the above

pub mod compiler;
pub mod document;
pub mod error;
pub mod layout;
pub mod registry;
pub mod reshape;
pub mod validation;

pub use compiler::{CONTINUE_ERROR_OUTPUT, Compiler, CompilerBuilder, ON_ERROR_PARAMETER};
pub use document::{
    Branch, CompiledNode, ConnectionMap, ConnectionTarget, NodeConnections, Position, TypeVersion,
    WorkflowDocument,
};
pub use error::CompileError;
pub use layout::{LayoutConfig, layout};
pub use registry::SchemaRegistry;
pub use reshape::reshape;
pub use validation::{
    IssueCode, MAX_OUTPUTS, OutputCount, OutputLimits, ValidationIssue, ValidationResult, Validator,
};
