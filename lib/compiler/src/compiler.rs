//! The compile pipeline.
//!
//! ```text
//! load schemas -> validate -> layout -> compiled nodes -> nested connections -> document
//! ```

use crate::document::{CompiledNode, Position, WorkflowDocument};
use crate::error::CompileError;
use crate::layout::{LayoutConfig, layout};
use crate::registry::SchemaRegistry;
use crate::reshape::reshape;
use crate::validation::{ValidationResult, Validator};
use flowpress_core::NodeId;
use flowpress_schema::SchemaSource;
use flowpress_workflow::WorkflowGraph;
use rootcause::prelude::Report;
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Parameter injected into nodes whose error output is connected.
pub const ON_ERROR_PARAMETER: &str = "onError";

/// Value of [`ON_ERROR_PARAMETER`] routing failures to the error output.
pub const CONTINUE_ERROR_OUTPUT: &str = "continueErrorOutput";

/// Configures a [`Compiler`].
pub struct CompilerBuilder<'r> {
    registry: &'r SchemaRegistry,
    source: Arc<dyn SchemaSource>,
    validator: Validator,
    layout: LayoutConfig,
}

impl CompilerBuilder<'static> {
    /// Starts a builder using the process-wide registry.
    #[must_use]
    pub fn new(source: Arc<dyn SchemaSource>) -> Self {
        Self {
            registry: SchemaRegistry::global(),
            source,
            validator: Validator::new(),
            layout: LayoutConfig::default(),
        }
    }
}

impl<'r> CompilerBuilder<'r> {
    /// Uses a caller-owned registry instead of the process-wide one.
    #[must_use]
    pub fn with_registry<'a>(self, registry: &'a SchemaRegistry) -> CompilerBuilder<'a> {
        CompilerBuilder {
            registry,
            source: self.source,
            validator: self.validator,
            layout: self.layout,
        }
    }

    /// Replaces the validator.
    #[must_use]
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Replaces the layout grid.
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Finishes configuration.
    #[must_use]
    pub fn build(self) -> Compiler<'r> {
        Compiler {
            registry: self.registry,
            source: self.source,
            validator: self.validator,
            layout: self.layout,
        }
    }
}

/// Compiles workflow graphs into importable documents.
pub struct Compiler<'r> {
    registry: &'r SchemaRegistry,
    source: Arc<dyn SchemaSource>,
    validator: Validator,
    layout: LayoutConfig,
}

impl Compiler<'static> {
    /// Creates a compiler with default settings and the process-wide registry.
    #[must_use]
    pub fn new(source: Arc<dyn SchemaSource>) -> Self {
        CompilerBuilder::new(source).build()
    }

    /// Starts configuring a compiler.
    #[must_use]
    pub fn builder(source: Arc<dyn SchemaSource>) -> CompilerBuilder<'static> {
        CompilerBuilder::new(source)
    }
}

impl Compiler<'_> {
    /// Validates a graph without compiling it.
    #[must_use]
    pub fn validate(&self, graph: &WorkflowGraph) -> ValidationResult {
        self.validator.validate(graph.nodes(), graph.connections())
    }

    /// Compiles a graph.
    ///
    /// Loads the schema registry on first use. Warnings are logged; any
    /// validation error aborts with every error attached.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::SchemaLoad`] if the registry cannot be loaded
    /// and [`CompileError::Validation`] if the graph is invalid.
    #[instrument(skip_all, fields(workflow = %graph.name(), nodes = graph.node_count()))]
    pub async fn compile(&self, graph: &WorkflowGraph) -> Result<WorkflowDocument, Report<CompileError>> {
        self.registry
            .load(self.source.as_ref())
            .await
            .map_err(|e| CompileError::SchemaLoad { details: e.to_string() })?;

        let result = self.validate(graph);
        for issue in &result.warnings {
            warn!(code = %issue.code, node = issue.node.as_deref(), "{}", issue.message);
        }
        if !result.valid {
            debug!(errors = result.errors.len(), "validation failed");
            return Err(CompileError::Validation { errors: result.errors }.into());
        }

        let positions = layout(graph.nodes(), graph.connections(), &self.layout);
        let error_sources: HashSet<&str> = graph
            .connections()
            .iter()
            .filter(|c| c.is_error())
            .map(|c| c.from.as_str())
            .collect();

        let nodes: Vec<CompiledNode> = graph
            .nodes()
            .iter()
            .map(|node| {
                let mut parameters = node.parameters.clone();
                if error_sources.contains(node.name.as_str()) {
                    parameters.insert(
                        ON_ERROR_PARAMETER.to_string(),
                        JsonValue::from(CONTINUE_ERROR_OUTPUT),
                    );
                }
                let position = positions
                    .get(&node.name)
                    .copied()
                    .unwrap_or(Position(self.layout.origin_x, self.layout.origin_y));

                CompiledNode {
                    id: NodeId::new(),
                    name: node.name.clone(),
                    node_type: node.node_type.clone(),
                    type_version: self.registry.type_version(&node.node_type),
                    position,
                    parameters,
                    credentials: node.credentials.clone(),
                }
            })
            .collect();

        let connections = reshape(graph.connections());

        info!(
            connections = graph.connection_count(),
            warnings = result.warnings.len(),
            "compiled workflow"
        );

        Ok(WorkflowDocument {
            name: graph.name().to_string(),
            nodes,
            connections,
            active: false,
            settings: serde_json::Map::new(),
        })
    }
}
