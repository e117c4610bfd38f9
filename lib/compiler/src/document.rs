//! Compiled workflow document types.
//!
//! These mirror the JSON the automation platform imports: a flat node list
//! with ids, versions and canvas positions, plus connections nested by
//! source node, connection type, output branch and target.

use flowpress_core::NodeId;
use flowpress_workflow::{Connection, ConnectionType, CredentialRef, Parameters};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A node-type schema version.
///
/// The platform uses fractional versions (`4.2`); integral versions are
/// written as JSON integers.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TypeVersion(f64);

impl TypeVersion {
    /// The version stamped onto nodes whose type has no known schema.
    pub const FALLBACK: Self = Self(1.0);

    /// Creates a type version.
    #[must_use]
    pub const fn new(version: f64) -> Self {
        Self(version)
    }

    /// Returns the numeric version.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Default for TypeVersion {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl fmt::Display for TypeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for TypeVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.0.fract() == 0.0 && self.0.abs() < i64::MAX as f64 {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for TypeVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        f64::deserialize(deserializer).map(Self)
    }
}

/// A canvas position, written as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position(pub i64, pub i64);

impl Position {
    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> i64 {
        self.0
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> i64 {
        self.1
    }
}

/// A node as written into the compiled document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledNode {
    /// Freshly generated identifier.
    pub id: NodeId,
    /// Node name.
    pub name: String,
    /// Node type.
    #[serde(rename = "type")]
    pub node_type: String,
    /// Resolved schema version.
    pub type_version: TypeVersion,
    /// Canvas position.
    pub position: Position,
    /// Node parameters (a copy of the input, possibly with `onError` added).
    pub parameters: Parameters,
    /// Credentials by credential type name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub credentials: BTreeMap<String, CredentialRef>,
}

/// One connection target within an output branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTarget {
    /// Target node name.
    pub node: String,
    /// Connection type.
    #[serde(rename = "type")]
    pub connection_type: ConnectionType,
    /// Input port on the target node.
    pub index: u32,
}

/// The targets of one output branch.
pub type Branch = Vec<ConnectionTarget>;

/// All outgoing connections of one source node, by connection type.
///
/// Position in each outer list equals the output index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConnections {
    /// Main output branches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<Vec<Branch>>,
    /// Error output branches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Vec<Branch>>,
}

impl NodeConnections {
    /// Returns the branches for a connection type, if present.
    #[must_use]
    pub fn branches(&self, connection_type: ConnectionType) -> Option<&[Branch]> {
        match connection_type {
            ConnectionType::Main => self.main.as_deref(),
            ConnectionType::Error => self.error.as_deref(),
        }
    }

    /// Returns the branches for a connection type, creating them if absent.
    pub fn branches_mut(&mut self, connection_type: ConnectionType) -> &mut Vec<Branch> {
        match connection_type {
            ConnectionType::Main => self.main.get_or_insert_with(Vec::new),
            ConnectionType::Error => self.error.get_or_insert_with(Vec::new),
        }
    }
}

/// Connections of a compiled workflow, keyed by source node name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionMap(BTreeMap<String, NodeConnections>);

impl ConnectionMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the outgoing connections of a source node.
    #[must_use]
    pub fn get(&self, source: &str) -> Option<&NodeConnections> {
        self.0.get(source)
    }

    pub(crate) fn entry(&mut self, source: &str) -> &mut NodeConnections {
        self.0.entry(source.to_string()).or_default()
    }

    /// Returns the number of source nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no node has outgoing connections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Expands the nested structure back into flat connections.
    ///
    /// Sources are visited in name order; within a source, main branches
    /// come before error branches.
    #[must_use]
    pub fn flatten(&self) -> Vec<Connection> {
        let mut flat = Vec::new();
        for (source, conns) in &self.0 {
            for connection_type in [ConnectionType::Main, ConnectionType::Error] {
                let Some(branches) = conns.branches(connection_type) else {
                    continue;
                };
                for (output_index, branch) in branches.iter().enumerate() {
                    for target in branch {
                        flat.push(
                            Connection::new(source, &target.node)
                                .with_output(output_index as u32)
                                .with_input(target.index)
                                .with_type(target.connection_type),
                        );
                    }
                }
            }
        }
        flat
    }

    /// Returns the total number of connection targets.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.0
            .values()
            .flat_map(|conns| conns.main.iter().chain(conns.error.iter()))
            .flatten()
            .map(Vec::len)
            .sum()
    }
}

/// A compiled workflow, ready to be imported or deployed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    /// Workflow name.
    pub name: String,
    /// Compiled nodes, in input order.
    pub nodes: Vec<CompiledNode>,
    /// Nested connections.
    pub connections: ConnectionMap,
    /// Always false at compile time; activation happens at deployment.
    pub active: bool,
    /// Workflow settings.
    pub settings: serde_json::Map<String, serde_json::Value>,
}

impl WorkflowDocument {
    /// Returns the compiled node with the given name, if any.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&CompiledNode> {
        self.nodes.iter().find(|n| n.name == name)
    }
}
