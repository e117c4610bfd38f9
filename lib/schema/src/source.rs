//! Bulk sources of schema records.

use crate::error::SchemaError;
use crate::types::NodeTypeSchema;
use async_trait::async_trait;
use rootcause::prelude::Report;

/// A provider of every locally available node-type schema record.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Reads all schema records.
    async fn read_all(&self) -> Result<Vec<NodeTypeSchema>, Report<SchemaError>>;
}

/// An in-memory schema source.
#[derive(Debug, Clone, Default)]
pub struct StaticSchemas {
    schemas: Vec<NodeTypeSchema>,
}

impl StaticSchemas {
    /// Creates a source serving the given records.
    #[must_use]
    pub fn new(schemas: Vec<NodeTypeSchema>) -> Self {
        Self { schemas }
    }

    /// Creates a source with no records.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SchemaSource for StaticSchemas {
    async fn read_all(&self) -> Result<Vec<NodeTypeSchema>, Report<SchemaError>> {
        Ok(self.schemas.clone())
    }
}
