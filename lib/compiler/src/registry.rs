//! Type-version resolution.
//!
//! A [`SchemaRegistry`] maps node-type names to the version stamped onto
//! compiled nodes. It is loaded once from a [`SchemaSource`] and never
//! refreshed. Concurrent loads share one in-flight read; later loads are
//! no-ops.

use crate::document::TypeVersion;
use flowpress_schema::{NodeTypeSchema, SchemaError, SchemaSource};
use rootcause::prelude::Report;
use std::collections::HashMap;
use std::sync::LazyLock;
use tokio::sync::OnceCell;
use tracing::{info, instrument};

static GLOBAL: LazyLock<SchemaRegistry> = LazyLock::new(SchemaRegistry::new);

/// Default versions by node-type name.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    versions: OnceCell<HashMap<String, TypeVersion>>,
}

impl SchemaRegistry {
    /// Creates an unloaded registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Loads every schema record from `source`, unless already loaded.
    ///
    /// # Errors
    ///
    /// Returns the source's error if reading fails. The registry stays
    /// unloaded in that case and a later call retries.
    #[instrument(skip_all)]
    pub async fn load(&self, source: &dyn SchemaSource) -> Result<(), Report<SchemaError>> {
        self.versions
            .get_or_try_init(|| async {
                let schemas = source.read_all().await?;
                let versions = default_versions(&schemas);
                info!(schemas = schemas.len(), types = versions.len(), "loaded schema registry");
                Ok::<_, Report<SchemaError>>(versions)
            })
            .await?;
        Ok(())
    }

    /// Returns whether [`load`](Self::load) has completed.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.versions.initialized()
    }

    /// Returns the version to stamp onto nodes of `type_name`.
    ///
    /// Types without a schema record resolve to [`TypeVersion::FALLBACK`].
    ///
    /// # Panics
    ///
    /// Panics if the registry has not been loaded.
    #[must_use]
    pub fn type_version(&self, type_name: &str) -> TypeVersion {
        let Some(versions) = self.versions.get() else {
            panic!("schema registry used before load; await SchemaRegistry::load first");
        };
        versions.get(type_name).copied().unwrap_or(TypeVersion::FALLBACK)
    }

    /// Returns the number of known types, or zero if unloaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.get().map_or(0, HashMap::len)
    }

    /// Returns whether no types are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn default_versions(schemas: &[NodeTypeSchema]) -> HashMap<String, TypeVersion> {
    schemas
        .iter()
        .filter_map(|schema| {
            schema
                .default_version()
                .map(|version| (schema.name.clone(), TypeVersion::new(version)))
        })
        .collect()
}
