//! Subcommand implementations.

use crate::config::CliConfig;
use crate::error::CliError;
use flowpress_compiler::{Compiler, ValidationResult, Validator};
use flowpress_schema::SchemaCache;
use flowpress_workflow::WorkflowGraph;
use rootcause::prelude::Report;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, instrument};

/// What `build` produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    /// Workflow name.
    pub workflow: String,
    /// Number of compiled nodes.
    pub nodes: usize,
    /// Number of input connections.
    pub connections: usize,
    /// Where the document was written.
    pub output: PathBuf,
}

/// Returns the default output path: the input with a `.workflow.json` extension.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("workflow.json")
}

async fn read_graph(input: &Path) -> Result<WorkflowGraph, Report<CliError>> {
    let content = fs::read_to_string(input).await.map_err(|e| CliError::ReadInput {
        path: input.to_path_buf(),
        details: e.to_string(),
    })?;

    let graph = serde_json::from_str(&content).map_err(|e| CliError::ParseInput {
        path: input.to_path_buf(),
        details: e.to_string(),
    })?;
    Ok(graph)
}

/// Compiles a workflow graph file and writes the document.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed, compilation
/// fails, or the output cannot be written.
#[instrument(skip(config))]
pub async fn build(
    input: &Path,
    output: Option<&Path>,
    config: &CliConfig,
) -> Result<BuildSummary, Report<CliError>> {
    let graph = read_graph(input).await?;

    let compiler = Compiler::builder(Arc::new(SchemaCache::new(&config.schema_dir)))
        .with_layout(config.layout)
        .build();
    let document = compiler
        .compile(&graph)
        .await
        .map_err(|e| CliError::Compile { details: e.to_string() })?;

    let output = output.map_or_else(|| default_output_path(input), Path::to_path_buf);
    let json = serde_json::to_string_pretty(&document).map_err(|e| CliError::WriteOutput {
        path: output.clone(),
        details: e.to_string(),
    })?;
    fs::write(&output, json).await.map_err(|e| CliError::WriteOutput {
        path: output.clone(),
        details: e.to_string(),
    })?;
    debug!(output = %output.display(), "wrote compiled workflow");

    Ok(BuildSummary {
        workflow: document.name,
        nodes: document.nodes.len(),
        connections: graph.connection_count(),
        output,
    })
}

/// Validates a workflow graph file without compiling it.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed. An invalid graph
/// is not an error; inspect [`ValidationResult::valid`].
#[instrument]
pub async fn validate(input: &Path) -> Result<ValidationResult, Report<CliError>> {
    let graph = read_graph(input).await?;
    Ok(Validator::new().validate(graph.nodes(), graph.connections()))
}
