//! Expression strings referencing other nodes' output.
//!
//! The platform evaluates parameter strings starting with `=` as expressions.
//! This module builds such strings and finds the node names they reference;
//! it never evaluates them.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static NODE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\$(?:node\[\s*(?:'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)")\s*\]|\(\s*(?:'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)")\s*\))"#,
    )
    .expect("node reference pattern is valid")
});

/// One step of a path into a node's JSON output.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    Field(String),
    Index(usize),
}

/// A reference to (part of) the JSON output of a named node.
///
/// ```
/// use flowpress_workflow::expression::NodeOutput;
///
/// let email = NodeOutput::of("Webhook").field("body").field("email");
/// assert_eq!(email.expression(), "$node['Webhook'].json.body.email");
/// assert_eq!(email.wrapped(), "={{ $node['Webhook'].json.body.email }}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeOutput {
    node: String,
    path: Vec<PathSegment>,
}

impl NodeOutput {
    /// References the whole output of a node.
    #[must_use]
    pub fn of(node: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            path: Vec::new(),
        }
    }

    /// Descends into an object field. All-digit names become array indexes.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let segment = match name.parse::<usize>() {
            Ok(index) if name.bytes().all(|b| b.is_ascii_digit()) => PathSegment::Index(index),
            _ => PathSegment::Field(name),
        };
        self.path.push(segment);
        self
    }

    /// Descends into an array element.
    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.path.push(PathSegment::Index(index));
        self
    }

    /// Renders the bare expression, for embedding into a larger one.
    #[must_use]
    pub fn expression(&self) -> String {
        let mut out = format!("$node['{}'].json", escape_quotes(&self.node));
        for segment in &self.path {
            match segment {
                PathSegment::Field(name) => {
                    out.push('.');
                    out.push_str(name);
                }
                PathSegment::Index(index) => {
                    out.push_str(&format!("[{index}]"));
                }
            }
        }
        out
    }

    /// Renders a complete parameter value (`={{ ... }}`).
    #[must_use]
    pub fn wrapped(&self) -> String {
        format!("={{{{ {} }}}}", self.expression())
    }
}

impl fmt::Display for NodeOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.wrapped())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TemplatePart {
    Text(String),
    Reference(NodeOutput),
}

/// A string template mixing literal text with node output references.
///
/// ```
/// use flowpress_workflow::expression::{NodeOutput, Template};
///
/// let greeting = Template::new()
///     .text("Hello ")
///     .reference(NodeOutput::of("Webhook").field("name"))
///     .build();
/// assert_eq!(greeting, "={{ 'Hello ' + $node['Webhook'].json.name }}");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    parts: Vec<TemplatePart>,
}

impl Template {
    /// Creates an empty template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends literal text.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(TemplatePart::Text(text.into()));
        self
    }

    /// Appends a node output reference.
    #[must_use]
    pub fn reference(mut self, output: NodeOutput) -> Self {
        self.parts.push(TemplatePart::Reference(output));
        self
    }

    /// Renders the template.
    ///
    /// A template without references renders as its plain text.
    #[must_use]
    pub fn build(&self) -> String {
        let has_reference = self
            .parts
            .iter()
            .any(|part| matches!(part, TemplatePart::Reference(_)));

        if !has_reference {
            return self
                .parts
                .iter()
                .filter_map(|part| match part {
                    TemplatePart::Text(text) => Some(text.as_str()),
                    TemplatePart::Reference(_) => None,
                })
                .collect();
        }

        let terms: Vec<String> = self
            .parts
            .iter()
            .filter_map(|part| match part {
                TemplatePart::Text(text) if text.is_empty() => None,
                TemplatePart::Text(text) => Some(format!("'{}'", escape_quotes(text))),
                TemplatePart::Reference(output) => Some(output.expression()),
            })
            .collect();

        format!("={{{{ {} }}}}", terms.join(" + "))
    }
}

fn escape_quotes(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Returns the names of all nodes referenced in an expression string, in
/// order of appearance (duplicates included).
///
/// Recognises `$node['Name']`, `$node["Name"]`, `$('Name')` and `$("Name")`.
#[must_use]
pub fn referenced_nodes(text: &str) -> Vec<String> {
    NODE_REFERENCE
        .captures_iter(text)
        .filter_map(|caps| {
            caps.iter()
                .skip(1)
                .flatten()
                .next()
                .map(|m| unescape(m.as_str()))
        })
        .collect()
}
