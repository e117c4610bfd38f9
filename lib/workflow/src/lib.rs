//! Workflow graph model for flowpress.
//!
//! This crate provides the input side of the workflow compiler:
//!
//! - **Graph Model**: named nodes with open-ended parameters, typed connections
//! - **Builder**: a fluent API that rejects duplicate names and dangling connections
//! - **Triggers**: classification of node types into entry points and actions
//! - **Expressions**: builders for node-output references and a scanner for them

pub mod builder;
pub mod connection;
pub mod error;
pub mod expression;
pub mod graph;
pub mod node;
pub mod trigger;

pub use builder::{NodeRef, WorkflowBuilder};
pub use connection::{Connection, ConnectionType};
pub use error::BuilderError;
pub use graph::WorkflowGraph;
pub use node::{CredentialRef, Node, Parameters};
pub use trigger::NodeKind;
