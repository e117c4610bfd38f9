//! Structural validation of workflow graphs.
//!
//! Problems are reported as data: every check runs, and the caller decides
//! what to do with the accumulated issues. Warnings never make a graph
//! invalid.

use flowpress_workflow::expression::referenced_nodes;
use flowpress_workflow::{Connection, Node};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Machine-readable issue codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    /// A non-empty graph has no trigger node.
    NoTrigger,
    /// A trigger without outgoing, or an action without incoming, connections.
    OrphanNode,
    /// A connection names a node that does not exist.
    InvalidConnection,
    /// A connection uses an output branch the source type does not have.
    InvalidOutputIndex,
    /// A node carries credentials that must exist on the target.
    MissingCredentials,
    /// A parameter expression references a node that does not exist.
    InvalidRef,
}

impl IssueCode {
    /// Returns the wire name of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoTrigger => "NO_TRIGGER",
            Self::OrphanNode => "ORPHAN_NODE",
            Self::InvalidConnection => "INVALID_CONNECTION",
            Self::InvalidOutputIndex => "INVALID_OUTPUT_INDEX",
            Self::MissingCredentials => "MISSING_CREDENTIALS",
            Self::InvalidRef => "INVALID_REF",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// What kind of problem this is.
    pub code: IssueCode,
    /// Human-readable explanation.
    pub message: String,
    /// The offending node, when one can be named.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
}

impl ValidationIssue {
    fn new(code: IssueCode, message: String, node: Option<&str>) -> Self {
        Self {
            code,
            message,
            node: node.map(str::to_string),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// The outcome of validating a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// True iff `errors` is empty.
    pub valid: bool,
    /// Blocking issues.
    pub errors: Vec<ValidationIssue>,
    /// Informational issues.
    pub warnings: Vec<ValidationIssue>,
}

/// Upper bound on output branches for any node, listed in the table or not.
pub const MAX_OUTPUTS: u32 = 1024;

/// How many outputs a node type has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCount {
    /// Exactly this many output branches.
    Fixed(u32),
    /// Configurable number of branches; never bounded.
    Variable,
}

/// Output counts for node types with more than one output.
///
/// Types not listed are bounded only by [`MAX_OUTPUTS`]. The table is a
/// known subset of the catalog, not a complete one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLimits {
    limits: HashMap<String, OutputCount>,
}

impl Default for OutputLimits {
    fn default() -> Self {
        let mut limits = HashMap::new();
        limits.insert("n8n-nodes-base.if".to_string(), OutputCount::Fixed(2));
        limits.insert("n8n-nodes-base.switch".to_string(), OutputCount::Variable);
        Self { limits }
    }
}

impl OutputLimits {
    /// Records the output count of a node type.
    pub fn insert(&mut self, node_type: impl Into<String>, count: OutputCount) {
        self.limits.insert(node_type.into(), count);
    }

    /// Returns the fixed output count of a node type, if bounded.
    #[must_use]
    pub fn max_outputs(&self, node_type: &str) -> Option<u32> {
        match self.limits.get(node_type) {
            Some(OutputCount::Fixed(count)) => Some(*count),
            Some(OutputCount::Variable) | None => None,
        }
    }
}

/// Runs the structural checks over a graph.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    limits: OutputLimits,
}

impl Validator {
    /// Creates a validator with the default output-count table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds a node type to a fixed number of outputs.
    #[must_use]
    pub fn with_output_limit(mut self, node_type: impl Into<String>, outputs: u32) -> Self {
        self.limits.insert(node_type, OutputCount::Fixed(outputs));
        self
    }

    /// Validates a graph. Never fails; problems are returned as issues.
    #[must_use]
    pub fn validate(&self, nodes: &[Node], connections: &[Connection]) -> ValidationResult {
        let known: HashSet<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        check_trigger_presence(nodes, &mut errors);
        check_orphans(nodes, connections, &mut errors);
        check_connection_endpoints(connections, &known, &mut errors);
        self.check_output_indexes(nodes, connections, &mut errors);
        check_credentials(nodes, &mut warnings);
        check_expression_refs(nodes, &known, &mut errors);

        ValidationResult {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    fn check_output_indexes(&self, nodes: &[Node], connections: &[Connection], errors: &mut Vec<ValidationIssue>) {
        let types: HashMap<&str, &str> = nodes
            .iter()
            .map(|n| (n.name.as_str(), n.node_type.as_str()))
            .collect();

        for conn in connections {
            let node_type = types.get(conn.from.as_str()).copied();
            let fixed = node_type
                .and_then(|t| self.limits.max_outputs(t))
                .filter(|&max| max < MAX_OUTPUTS);
            let message = match (node_type, fixed) {
                (Some(node_type), Some(max)) if conn.output_index >= max => format!(
                    "connection from '{}' to '{}' uses output {}, but {node_type} has only {max} output(s)",
                    conn.from, conn.to, conn.output_index
                ),
                _ if conn.output_index >= MAX_OUTPUTS => format!(
                    "connection from '{}' to '{}' uses output {}, but no node may have more than {MAX_OUTPUTS} outputs",
                    conn.from, conn.to, conn.output_index
                ),
                _ => continue,
            };
            errors.push(ValidationIssue::new(
                IssueCode::InvalidOutputIndex,
                message,
                Some(conn.from.as_str()),
            ));
        }
    }
}

fn check_trigger_presence(nodes: &[Node], errors: &mut Vec<ValidationIssue>) {
    if !nodes.is_empty() && !nodes.iter().any(Node::is_trigger) {
        errors.push(ValidationIssue::new(
            IssueCode::NoTrigger,
            "workflow has no trigger node; add a trigger or webhook node as its entry point".to_string(),
            None,
        ));
    }
}

fn check_orphans(nodes: &[Node], connections: &[Connection], errors: &mut Vec<ValidationIssue>) {
    let sources: HashSet<&str> = connections.iter().map(|c| c.from.as_str()).collect();
    let targets: HashSet<&str> = connections.iter().map(|c| c.to.as_str()).collect();

    for node in nodes {
        let name = node.name.as_str();
        if node.is_trigger() {
            if nodes.len() > 1 && !sources.contains(name) {
                errors.push(ValidationIssue::new(
                    IssueCode::OrphanNode,
                    format!("trigger '{name}' has no outgoing connections"),
                    Some(name),
                ));
            }
        } else if !targets.contains(name) {
            errors.push(ValidationIssue::new(
                IssueCode::OrphanNode,
                format!("node '{name}' has no incoming connections and will never run"),
                Some(name),
            ));
        }
    }
}

fn check_connection_endpoints(connections: &[Connection], known: &HashSet<&str>, errors: &mut Vec<ValidationIssue>) {
    for conn in connections {
        for (side, name) in [("source", &conn.from), ("target", &conn.to)] {
            if !known.contains(name.as_str()) {
                errors.push(ValidationIssue::new(
                    IssueCode::InvalidConnection,
                    format!("connection {side} '{name}' does not exist in the workflow"),
                    Some(name.as_str()),
                ));
            }
        }
    }
}

fn check_credentials(nodes: &[Node], warnings: &mut Vec<ValidationIssue>) {
    for node in nodes.iter().filter(|n| n.has_credentials()) {
        let types: Vec<&str> = node.credentials.keys().map(String::as_str).collect();
        warnings.push(ValidationIssue::new(
            IssueCode::MissingCredentials,
            format!(
                "node '{}' uses credentials ({}); credential ids are environment-specific and must exist on the target instance",
                node.name,
                types.join(", ")
            ),
            Some(node.name.as_str()),
        ));
    }
}

fn check_expression_refs(nodes: &[Node], known: &HashSet<&str>, errors: &mut Vec<ValidationIssue>) {
    for node in nodes {
        let mut reported = HashSet::new();
        let mut strings = Vec::new();
        for value in node.parameters.values() {
            collect_strings(value, &mut strings);
        }

        for text in strings {
            for referenced in referenced_nodes(text) {
                if !known.contains(referenced.as_str()) && reported.insert(referenced.clone()) {
                    errors.push(ValidationIssue::new(
                        IssueCode::InvalidRef,
                        format!(
                            "node '{}' references unknown node '{referenced}' in an expression",
                            node.name
                        ),
                        Some(node.name.as_str()),
                    ));
                }
            }
        }
    }
}

fn collect_strings<'a>(value: &'a JsonValue, out: &mut Vec<&'a str>) {
    match value {
        JsonValue::String(text) => out.push(text),
        JsonValue::Array(items) => items.iter().for_each(|item| collect_strings(item, out)),
        JsonValue::Object(fields) => fields.values().for_each(|field| collect_strings(field, out)),
        JsonValue::Null | JsonValue::Bool(_) | JsonValue::Number(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowpress_workflow::{CredentialRef, Parameters};
    use serde_json::json;

    fn node(name: &str, node_type: &str) -> Node {
        Node::new(name, node_type, Parameters::new())
    }

    fn with_params(name: &str, node_type: &str, params: JsonValue) -> Node {
        let JsonValue::Object(parameters) = params else {
            panic!("parameters must be an object");
        };
        Node::new(name, node_type, parameters)
    }

    fn codes(issues: &[ValidationIssue]) -> Vec<IssueCode> {
        issues.iter().map(|i| i.code).collect()
    }

    #[test]
    fn empty_graph_is_valid() {
        let result = Validator::new().validate(&[], &[]);
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn single_trigger_is_valid() {
        let result = Validator::new().validate(&[node("Start", "n8n-nodes-base.manualTrigger")], &[]);
        assert!(result.valid, "{:?}", result.errors);
    }

    #[test]
    fn missing_trigger() {
        let nodes = vec![node("A", "n8n-nodes-base.set"), node("B", "n8n-nodes-base.noOp")];
        let conns = vec![Connection::new("A", "B")];
        let result = Validator::new().validate(&nodes, &conns);

        assert!(!result.valid);
        assert_eq!(result.errors[0].code, IssueCode::NoTrigger);
        assert!(result.errors[0].node.is_none());
    }

    #[test]
    fn orphans_on_both_sides() {
        let nodes = vec![
            node("Start", "n8n-nodes-base.manualTrigger"),
            node("Lonely", "n8n-nodes-base.noOp"),
        ];
        let result = Validator::new().validate(&nodes, &[]);

        assert_eq!(codes(&result.errors), vec![IssueCode::OrphanNode, IssueCode::OrphanNode]);
        assert_eq!(result.errors[0].node.as_deref(), Some("Start"));
        assert_eq!(result.errors[1].node.as_deref(), Some("Lonely"));
    }

    #[test]
    fn dangling_connection_names_node() {
        let nodes = vec![
            node("Start", "n8n-nodes-base.manualTrigger"),
            node("Next", "n8n-nodes-base.noOp"),
        ];
        let conns = vec![Connection::new("Start", "Next"), Connection::new("Next", "Ghost")];
        let result = Validator::new().validate(&nodes, &conns);

        assert_eq!(codes(&result.errors), vec![IssueCode::InvalidConnection]);
        assert_eq!(result.errors[0].node.as_deref(), Some("Ghost"));
        assert!(result.errors[0].message.contains("Ghost"));
    }

    #[test]
    fn if_node_has_two_outputs() {
        let nodes = vec![
            node("Start", "n8n-nodes-base.manualTrigger"),
            node("Check", "n8n-nodes-base.if"),
            node("Yes", "n8n-nodes-base.noOp"),
            node("No", "n8n-nodes-base.noOp"),
            node("Maybe", "n8n-nodes-base.noOp"),
        ];
        let conns = vec![
            Connection::new("Start", "Check"),
            Connection::new("Check", "Yes"),
            Connection::new("Check", "No").with_output(1),
            Connection::new("Check", "Maybe").with_output(2),
        ];
        let result = Validator::new().validate(&nodes, &conns);

        assert_eq!(codes(&result.errors), vec![IssueCode::InvalidOutputIndex]);
        assert_eq!(result.errors[0].node.as_deref(), Some("Check"));
    }

    #[test]
    fn switch_and_unknown_types_are_unbounded() {
        let nodes = vec![
            node("Start", "n8n-nodes-base.manualTrigger"),
            node("Route", "n8n-nodes-base.switch"),
            node("Custom", "acme.router"),
            node("Far", "n8n-nodes-base.noOp"),
            node("Farther", "n8n-nodes-base.noOp"),
        ];
        let conns = vec![
            Connection::new("Start", "Route"),
            Connection::new("Route", "Custom").with_output(7),
            Connection::new("Custom", "Far").with_output(3),
            Connection::new("Custom", "Farther").with_output(9),
        ];
        assert!(Validator::new().validate(&nodes, &conns).valid);
    }

    #[test]
    fn huge_output_index_is_rejected_for_any_type() {
        let nodes = vec![
            node("Start", "n8n-nodes-base.manualTrigger"),
            node("Route", "n8n-nodes-base.switch"),
            node("Next", "n8n-nodes-base.noOp"),
            node("Edge", "n8n-nodes-base.noOp"),
        ];
        let conns = vec![
            Connection::new("Start", "Route"),
            Connection::new("Route", "Next").with_output(5000),
            Connection::new("Route", "Edge").with_output(MAX_OUTPUTS - 1),
        ];
        let result = Validator::new().validate(&nodes, &conns);
        assert_eq!(codes(&result.errors), vec![IssueCode::InvalidOutputIndex]);
        assert!(result.errors[0].message.contains("output 5000"));
    }

    #[test]
    fn custom_output_limit() {
        let nodes = vec![
            node("Start", "n8n-nodes-base.manualTrigger"),
            node("Route", "acme.router"),
            node("Next", "n8n-nodes-base.noOp"),
        ];
        let conns = vec![
            Connection::new("Start", "Route"),
            Connection::new("Route", "Next").with_output(3),
        ];
        let result = Validator::new()
            .with_output_limit("acme.router", 3)
            .validate(&nodes, &conns);
        assert_eq!(codes(&result.errors), vec![IssueCode::InvalidOutputIndex]);
    }

    #[test]
    fn credentials_warn_once_per_node() {
        let slack = node("Slack", "n8n-nodes-base.slack")
            .with_credential("slackApi", CredentialRef::new("1", "Slack"))
            .with_credential("slackOAuth2Api", CredentialRef::new("2", "Slack OAuth"));
        let nodes = vec![node("Start", "n8n-nodes-base.manualTrigger"), slack];
        let conns = vec![Connection::new("Start", "Slack")];
        let result = Validator::new().validate(&nodes, &conns);

        assert!(result.valid);
        assert_eq!(codes(&result.warnings), vec![IssueCode::MissingCredentials]);
        assert!(result.warnings[0].message.contains("slackApi"));
    }

    #[test]
    fn unknown_expression_reference() {
        let nodes = vec![
            node("Webhook", "n8n-nodes-base.webhook"),
            with_params(
                "Reply",
                "n8n-nodes-base.slack",
                json!({
                    "text": "={{ $node['Webhook'].json.body }}",
                    "blocks": [{ "value": "={{ $('Lookup').item.json.id }}" }],
                    "footer": "={{ $node[\"Lookup\"].json.name }}"
                }),
            ),
        ];
        let conns = vec![Connection::new("Webhook", "Reply")];
        let result = Validator::new().validate(&nodes, &conns);

        assert_eq!(codes(&result.errors), vec![IssueCode::InvalidRef]);
        assert_eq!(result.errors[0].node.as_deref(), Some("Reply"));
        assert!(result.errors[0].message.contains("Lookup"));
    }

    #[test]
    fn errors_accumulate_in_check_order() {
        let nodes = vec![
            node("A", "n8n-nodes-base.if"),
            with_params("B", "n8n-nodes-base.set", json!({ "v": "={{ $node['Nope'].json }}" })),
        ];
        let conns = vec![
            Connection::new("A", "B").with_output(5),
            Connection::new("B", "Missing"),
        ];
        let result = Validator::new().validate(&nodes, &conns);

        assert_eq!(
            codes(&result.errors),
            vec![
                IssueCode::NoTrigger,
                IssueCode::OrphanNode,
                IssueCode::InvalidConnection,
                IssueCode::InvalidOutputIndex,
                IssueCode::InvalidRef,
            ]
        );
    }

    #[test]
    fn issue_codes_serialize_screaming() {
        let issue = ValidationIssue::new(IssueCode::InvalidOutputIndex, "x".to_string(), None);
        let json = serde_json::to_value(&issue).expect("serialize");
        assert_eq!(json["code"], "INVALID_OUTPUT_INDEX");
        assert_eq!(issue.to_string(), "[INVALID_OUTPUT_INDEX] x");
    }
}
