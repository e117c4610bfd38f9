//! Workflow node types.
//!
//! A node is identified by its name, which is unique within a workflow. Its
//! type names a schema in the platform's node-type catalog, and its
//! parameters are an open-ended, ordered JSON object whose shape is defined
//! by that catalog.

use crate::trigger::NodeKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

/// Ordered node parameters, including embedded expression strings.
pub type Parameters = Map<String, JsonValue>;

/// A reference to a credential stored on the deployment target.
///
/// Credential ids are environment-specific: the referenced credential must
/// already exist on the target instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRef {
    /// Credential id on the target instance.
    pub id: String,
    /// Credential display name.
    pub name: String,
}

impl CredentialRef {
    /// Creates a new credential reference.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A workflow node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Name of this node, unique within the workflow.
    pub name: String,
    /// Node type (e.g. `n8n-nodes-base.slack`).
    #[serde(rename = "type")]
    pub node_type: String,
    /// Node configuration.
    #[serde(default)]
    pub parameters: Parameters,
    /// Credentials by credential type name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub credentials: BTreeMap<String, CredentialRef>,
}

impl Node {
    /// Creates a new node without credentials.
    #[must_use]
    pub fn new(name: impl Into<String>, node_type: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            name: name.into(),
            node_type: node_type.into(),
            parameters,
            credentials: BTreeMap::new(),
        }
    }

    /// Adds a credential reference for the given credential type.
    #[must_use]
    pub fn with_credential(
        mut self,
        credential_type: impl Into<String>,
        credential: CredentialRef,
    ) -> Self {
        self.credentials.insert(credential_type.into(), credential);
        self
    }

    /// Returns how this node's type is classified.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        NodeKind::of(&self.node_type)
    }

    /// Returns whether this node is classified as a trigger.
    #[must_use]
    pub fn is_trigger(&self) -> bool {
        self.kind() == NodeKind::Trigger
    }

    /// Returns whether this node carries any credentials.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.credentials.is_empty()
    }
}
