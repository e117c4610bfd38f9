//! Schema record types.
//!
//! These model the node-type catalog entries served by the automation
//! platform's REST API. Only the fields the compiler and tooling need are
//! typed; the remainder of each record is kept verbatim in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// The version(s) a node type declares support for.
///
/// Catalog entries carry either a single number or a list of numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionSpec {
    /// A single supported version.
    Single(f64),
    /// Every supported version.
    Multiple(Vec<f64>),
}

impl VersionSpec {
    /// Returns the highest declared version, if any.
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        match self {
            Self::Single(version) => Some(*version),
            Self::Multiple(versions) => versions.iter().copied().reduce(f64::max),
        }
    }
}

/// A node-type schema record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeSchema {
    /// Fully qualified type name (e.g. `n8n-nodes-base.slack`).
    pub name: String,
    /// Human-readable name.
    #[serde(default)]
    pub display_name: String,
    /// Supported version(s).
    pub version: VersionSpec,
    /// The version the editor picks for newly created nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_version: Option<f64>,
    /// Description shown in the node picker.
    #[serde(default)]
    pub description: String,
    /// Catalog groups (e.g. `trigger`, `transform`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group: Vec<String>,
    /// Every other field of the record, untouched.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl NodeTypeSchema {
    /// Creates a schema record with only a name and a version.
    #[must_use]
    pub fn new(name: impl Into<String>, version: VersionSpec) -> Self {
        Self {
            name: name.into(),
            display_name: String::new(),
            version,
            default_version: None,
            description: String::new(),
            group: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Sets the explicit default version.
    #[must_use]
    pub fn with_default_version(mut self, version: f64) -> Self {
        self.default_version = Some(version);
        self
    }

    /// Returns the version to stamp onto compiled nodes of this type.
    ///
    /// The explicit `defaultVersion` wins; otherwise the highest declared
    /// version is used. Returns `None` only for an empty version list.
    #[must_use]
    pub fn default_version(&self) -> Option<f64> {
        self.default_version.or_else(|| self.version.max())
    }
}
