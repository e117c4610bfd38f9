//! Trigger classification for node types.
//!
//! Triggers are the entry points of a workflow. The platform does not mark
//! them explicitly in a workflow document, so they are recognised by the
//! naming convention of their type: the part after the package prefix ends
//! in `Trigger` (`n8n-nodes-base.scheduleTrigger`) or is exactly `webhook`
//! (`n8n-nodes-base.webhook`).

use serde::{Deserialize, Serialize};

/// How a node type participates in the workflow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Entry point that starts a workflow run.
    Trigger,
    /// Any node that receives items from another node.
    Action,
}

impl NodeKind {
    /// Classifies a node type name.
    #[must_use]
    pub fn of(node_type: &str) -> Self {
        let local = node_type
            .rsplit_once('.')
            .map_or(node_type, |(_, local)| local)
            .to_ascii_lowercase();

        if local.ends_with("trigger") || local == "webhook" {
            Self::Trigger
        } else {
            Self::Action
        }
    }
}
