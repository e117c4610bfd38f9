//! Immutable workflow graph snapshots.
//!
//! A `WorkflowGraph` is what the builder hands to the compiler: the node list
//! and the connection list as they were at the moment of the snapshot. Later
//! changes to the builder never reach a snapshot already taken.
//!
//! Snapshots can also be deserialised from JSON. Node names are still
//! required to be unique there, but nothing guarantees that connections name
//! existing nodes. That is the validator's job.

use crate::connection::Connection;
use crate::error::BuilderError;
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named workflow graph of nodes and connections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawGraph")]
pub struct WorkflowGraph {
    name: String,
    nodes: Vec<Node>,
    connections: Vec<Connection>,
}

#[derive(Deserialize)]
struct RawGraph {
    name: String,
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    connections: Vec<Connection>,
}

impl TryFrom<RawGraph> for WorkflowGraph {
    type Error = BuilderError;

    fn try_from(raw: RawGraph) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(raw.nodes.len());
        if let Some(dup) = raw.nodes.iter().find(|n| !seen.insert(n.name.as_str())) {
            return Err(BuilderError::DuplicateNode {
                name: dup.name.clone(),
            });
        }
        Ok(Self {
            name: raw.name,
            nodes: raw.nodes,
            connections: raw.connections,
        })
    }
}

impl WorkflowGraph {
    /// Creates a graph from raw parts without any checks.
    #[must_use]
    pub fn from_parts(name: impl Into<String>, nodes: Vec<Node>, connections: Vec<Connection>) -> Self {
        Self {
            name: name.into(),
            nodes,
            connections,
        }
    }

    /// Returns the workflow name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns all nodes, in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns all connections, in insertion order.
    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Returns the node with the given name, if any.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Returns whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}
