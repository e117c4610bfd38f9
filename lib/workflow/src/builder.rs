//! Fluent workflow construction.
//!
//! ```
//! use flowpress_workflow::{Parameters, WorkflowBuilder};
//!
//! let mut wf = WorkflowBuilder::new("My Workflow");
//! let webhook = wf.trigger("Webhook", "n8n-nodes-base.webhook", Parameters::new())?;
//! let slack = wf.node("Send Slack", "n8n-nodes-base.slack", Parameters::new())?;
//! wf.connect(&webhook, &slack)?;
//!
//! let graph = wf.build();
//! assert_eq!(graph.node_count(), 2);
//! # Ok::<(), rootcause::Report<flowpress_workflow::BuilderError>>(())
//! ```

use crate::connection::Connection;
use crate::error::BuilderError;
use crate::graph::WorkflowGraph;
use crate::node::{CredentialRef, Node, Parameters};
use rootcause::prelude::Report;
use std::collections::HashSet;

/// A handle to a node added to a builder, used to connect it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeRef {
    name: String,
}

impl NodeRef {
    /// Returns the referenced node's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builds a workflow graph node by node.
#[derive(Debug, Clone)]
pub struct WorkflowBuilder {
    name: String,
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    names: HashSet<String>,
}

impl WorkflowBuilder {
    /// Creates an empty workflow with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            connections: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Returns the workflow name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a trigger node.
    ///
    /// # Errors
    ///
    /// Returns an error if a node with the same name already exists.
    pub fn trigger(
        &mut self,
        name: impl Into<String>,
        node_type: impl Into<String>,
        parameters: Parameters,
    ) -> Result<NodeRef, Report<BuilderError>> {
        self.add_node(Node::new(name, node_type, parameters))
    }

    /// Adds an action node.
    ///
    /// # Errors
    ///
    /// Returns an error if a node with the same name already exists.
    pub fn node(
        &mut self,
        name: impl Into<String>,
        node_type: impl Into<String>,
        parameters: Parameters,
    ) -> Result<NodeRef, Report<BuilderError>> {
        self.add_node(Node::new(name, node_type, parameters))
    }

    /// Adds a fully constructed node (for example one carrying credentials).
    ///
    /// # Errors
    ///
    /// Returns an error if a node with the same name already exists.
    pub fn add_node(&mut self, node: Node) -> Result<NodeRef, Report<BuilderError>> {
        if !self.names.insert(node.name.clone()) {
            return Err(BuilderError::DuplicateNode { name: node.name }.into());
        }
        let node_ref = NodeRef {
            name: node.name.clone(),
        };
        self.nodes.push(node);
        Ok(node_ref)
    }

    /// Attaches a credential reference to an existing node.
    ///
    /// # Errors
    ///
    /// Returns an error if the node was never added.
    pub fn with_credential(
        &mut self,
        node: &NodeRef,
        credential_type: impl Into<String>,
        credential: CredentialRef,
    ) -> Result<(), Report<BuilderError>> {
        let target = self
            .nodes
            .iter_mut()
            .find(|n| n.name == node.name)
            .ok_or_else(|| BuilderError::UnknownNode {
                name: node.name.clone(),
            })?;
        target.credentials.insert(credential_type.into(), credential);
        Ok(())
    }

    /// Connects the main output of `from` to the first input of `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if either node was never added.
    pub fn connect(&mut self, from: &NodeRef, to: &NodeRef) -> Result<(), Report<BuilderError>> {
        self.push_connection(Connection::new(&from.name, &to.name))
    }

    /// Connects an alternate output branch of `from` (e.g. a conditional's
    /// false branch at index 1) to `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if either node was never added.
    pub fn connect_branch(
        &mut self,
        from: &NodeRef,
        to: &NodeRef,
        output_index: u32,
    ) -> Result<(), Report<BuilderError>> {
        self.push_connection(Connection::new(&from.name, &to.name).with_output(output_index))
    }

    /// Connects an output branch of `from` to a specific input port of `to`,
    /// as used by merge nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if either node was never added.
    pub fn connect_input(
        &mut self,
        from: &NodeRef,
        to: &NodeRef,
        output_index: u32,
        input_index: u32,
    ) -> Result<(), Report<BuilderError>> {
        self.push_connection(
            Connection::new(&from.name, &to.name)
                .with_output(output_index)
                .with_input(input_index),
        )
    }

    /// Routes the error output of `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if either node was never added.
    pub fn connect_error(&mut self, from: &NodeRef, to: &NodeRef) -> Result<(), Report<BuilderError>> {
        self.push_connection(Connection::error(&from.name, &to.name))
    }

    fn push_connection(&mut self, connection: Connection) -> Result<(), Report<BuilderError>> {
        for name in [&connection.from, &connection.to] {
            if !self.names.contains(name) {
                return Err(BuilderError::UnknownNode { name: name.clone() }.into());
            }
        }
        self.connections.push(connection);
        Ok(())
    }

    /// Returns a copy of the current nodes.
    #[must_use]
    pub fn nodes(&self) -> Vec<Node> {
        self.nodes.clone()
    }

    /// Returns a copy of the current connections.
    #[must_use]
    pub fn connections(&self) -> Vec<Connection> {
        self.connections.clone()
    }

    /// Takes an immutable snapshot of the graph built so far.
    #[must_use]
    pub fn build(&self) -> WorkflowGraph {
        WorkflowGraph::from_parts(self.name.clone(), self.nodes(), self.connections())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionType;

    #[test]
    fn builds_simple_graph() {
        let mut wf = WorkflowBuilder::new("Simple");
        let start = wf
            .trigger("Start", "n8n-nodes-base.manualTrigger", Parameters::new())
            .expect("trigger");
        let action = wf
            .node("Action", "n8n-nodes-base.noOp", Parameters::new())
            .expect("node");
        wf.connect(&start, &action).expect("connect");

        let graph = wf.build();
        assert_eq!(graph.name(), "Simple");
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.connections()[0], Connection::new("Start", "Action"));
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut wf = WorkflowBuilder::new("Dupes");
        wf.node("Same", "n8n-nodes-base.noOp", Parameters::new())
            .expect("first");
        let result = wf.node("Same", "n8n-nodes-base.set", Parameters::new());

        assert!(result.is_err());
        assert_eq!(wf.nodes().len(), 1);
    }

    #[test]
    fn rejects_unknown_nodes() {
        let mut wf = WorkflowBuilder::new("Unknown");
        let known = wf
            .node("Known", "n8n-nodes-base.noOp", Parameters::new())
            .expect("node");

        let mut other = WorkflowBuilder::new("Other");
        let foreign = other
            .node("Foreign", "n8n-nodes-base.noOp", Parameters::new())
            .expect("node");

        assert!(wf.connect(&known, &foreign).is_err());
        assert!(wf.connect(&foreign, &known).is_err());
        assert!(wf.connections().is_empty());
    }

    #[test]
    fn branch_merge_and_error_connections() {
        let mut wf = WorkflowBuilder::new("Shapes");
        let check = wf.node("Check", "n8n-nodes-base.if", Parameters::new()).expect("node");
        let merge = wf.node("Merge", "n8n-nodes-base.merge", Parameters::new()).expect("node");
        let alert = wf.node("Alert", "n8n-nodes-base.slack", Parameters::new()).expect("node");

        wf.connect_branch(&check, &merge, 1).expect("branch");
        wf.connect_input(&check, &merge, 0, 1).expect("input");
        wf.connect_error(&check, &alert).expect("error");

        let connections = wf.connections();
        assert_eq!(connections[0].output_index, 1);
        assert_eq!(connections[1].input_index, 1);
        assert_eq!(connections[2].connection_type, ConnectionType::Error);
    }

    #[test]
    fn snapshots_are_isolated_from_later_changes() {
        let mut wf = WorkflowBuilder::new("Snapshot");
        wf.trigger("Start", "n8n-nodes-base.manualTrigger", Parameters::new())
            .expect("trigger");
        let graph = wf.build();

        wf.node("Later", "n8n-nodes-base.noOp", Parameters::new())
            .expect("node");

        assert_eq!(graph.node_count(), 1);
        assert_eq!(wf.nodes().len(), 2);
    }

    #[test]
    fn credentials_attach_to_existing_nodes() {
        let mut wf = WorkflowBuilder::new("Creds");
        let slack = wf.node("Slack", "n8n-nodes-base.slack", Parameters::new()).expect("node");
        wf.with_credential(&slack, "slackApi", CredentialRef::new("7", "Slack"))
            .expect("credential");

        let graph = wf.build();
        assert!(graph.node("Slack").is_some_and(Node::has_credentials));
    }
}
