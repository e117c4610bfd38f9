//! Connection types for workflow graphs.
//!
//! A connection runs from one output branch of a source node to one input
//! port of a target node. Each connection specifies:
//! - The output index on the source (0 is the main branch, 1+ are
//!   alternate branches such as a conditional's false branch)
//! - The input index on the target (used by merge nodes)
//! - The connection type (`main` data flow or `error` routing)

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of data a connection carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    /// Regular item flow.
    #[default]
    Main,
    /// Items routed from a node's error output.
    Error,
}

impl ConnectionType {
    /// Returns the wire name of this connection type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A connection between two named nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Source node name.
    pub from: String,
    /// Target node name.
    pub to: String,
    /// Output branch on the source node.
    #[serde(default)]
    pub output_index: u32,
    /// Input port on the target node.
    #[serde(default)]
    pub input_index: u32,
    /// Connection type.
    #[serde(default)]
    pub connection_type: ConnectionType,
}

impl Connection {
    /// Creates a main connection between the default ports.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            output_index: 0,
            input_index: 0,
            connection_type: ConnectionType::Main,
        }
    }

    /// Creates an error connection from the source's error output.
    #[must_use]
    pub fn error(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(from, to).with_type(ConnectionType::Error)
    }

    /// Sets the output branch on the source node.
    #[must_use]
    pub fn with_output(mut self, output_index: u32) -> Self {
        self.output_index = output_index;
        self
    }

    /// Sets the input port on the target node.
    #[must_use]
    pub fn with_input(mut self, input_index: u32) -> Self {
        self.input_index = input_index;
        self
    }

    /// Sets the connection type.
    #[must_use]
    pub fn with_type(mut self, connection_type: ConnectionType) -> Self {
        self.connection_type = connection_type;
        self
    }

    /// Returns whether this connection routes error output.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.connection_type == ConnectionType::Error
    }
}
