//! Directory-backed schema cache.
//!
//! Each node type is stored as one pretty-printed JSON file named after the
//! type (`n8n-nodes-base.slack.json`). Scoped package names contain a `/`,
//! which is stored as `__` in the file name.

use crate::error::SchemaError;
use crate::source::SchemaSource;
use crate::types::NodeTypeSchema;
use async_trait::async_trait;
use rootcause::prelude::Report;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument};

const SCHEMA_EXTENSION: &str = ".json";
const SCOPE_SEPARATOR: &str = "__";

/// A directory of cached node-type schemas.
#[derive(Debug, Clone)]
pub struct SchemaCache {
    dir: PathBuf,
}

impl SchemaCache {
    /// Creates a cache rooted at the given directory.
    ///
    /// The directory is not touched until the cache is read or written.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, type_name: &str) -> PathBuf {
        let file_name = format!(
            "{}{SCHEMA_EXTENSION}",
            type_name.replace('/', SCOPE_SEPARATOR)
        );
        self.dir.join(file_name)
    }

    /// Writes a schema record, creating the cache directory if needed.
    pub async fn write(&self, schema: &NodeTypeSchema) -> Result<(), Report<SchemaError>> {
        let path = self.path_for(&schema.name);

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SchemaError::Write {
                path: self.dir.clone(),
                details: e.to_string(),
            })?;

        let content = serde_json::to_string_pretty(schema).map_err(|e| SchemaError::Write {
            path: path.clone(),
            details: e.to_string(),
        })?;

        fs::write(&path, content)
            .await
            .map_err(|e| SchemaError::Write {
                path: path.clone(),
                details: e.to_string(),
            })?;

        debug!(type_name = %schema.name, path = %path.display(), "schema cached");
        Ok(())
    }

    /// Reads the schema record for one node type.
    pub async fn read(&self, type_name: &str) -> Result<NodeTypeSchema, Report<SchemaError>> {
        self.read_path(&self.path_for(type_name)).await
    }

    async fn read_path(&self, path: &Path) -> Result<NodeTypeSchema, Report<SchemaError>> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| SchemaError::ReadFile {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;

        let schema = serde_json::from_str(&content).map_err(|e| SchemaError::Parse {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
        Ok(schema)
    }

    /// Lists the type names of all cached schemas, sorted.
    ///
    /// A missing cache directory is treated as an empty cache.
    pub async fn list(&self) -> Result<Vec<String>, Report<SchemaError>> {
        let mut names: Vec<String> = self
            .schema_files()
            .await?
            .iter()
            .filter_map(|path| path.file_name()?.to_str().map(str::to_owned))
            .filter_map(|file_name| {
                file_name
                    .strip_suffix(SCHEMA_EXTENSION)
                    .map(|stem| stem.replace(SCOPE_SEPARATOR, "/"))
            })
            .collect();
        names.sort();
        Ok(names)
    }

    async fn schema_files(&self) -> Result<Vec<PathBuf>, Report<SchemaError>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(SchemaError::ReadDirectory {
                    path: self.dir.clone(),
                    details: e.to_string(),
                }
                .into());
            }
        };

        let mut files = Vec::new();
        loop {
            let entry = entries
                .next_entry()
                .await
                .map_err(|e| SchemaError::ReadDirectory {
                    path: self.dir.clone(),
                    details: e.to_string(),
                })?;
            let Some(entry) = entry else {
                break;
            };

            let path = entry.path();
            let is_schema = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(SCHEMA_EXTENSION));
            if is_schema {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

#[async_trait]
impl SchemaSource for SchemaCache {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn read_all(&self) -> Result<Vec<NodeTypeSchema>, Report<SchemaError>> {
        let mut schemas = Vec::new();
        for path in self.schema_files().await? {
            schemas.push(self.read_path(&path).await?);
        }
        debug!(count = schemas.len(), "schemas read from cache");
        Ok(schemas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VersionSpec;

    #[tokio::test]
    async fn write_then_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = SchemaCache::new(dir.path());
        let schema = NodeTypeSchema::new("n8n-nodes-base.slack", VersionSpec::Single(2.2));

        cache.write(&schema).await.expect("write");
        let read = cache.read("n8n-nodes-base.slack").await.expect("read");

        assert_eq!(read, schema);
        assert!(dir.path().join("n8n-nodes-base.slack.json").exists());
    }

    #[tokio::test]
    async fn scoped_names_survive_listing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = SchemaCache::new(dir.path());
        cache
            .write(&NodeTypeSchema::new(
                "@n8n/n8n-nodes-langchain.agent",
                VersionSpec::Single(1.7),
            ))
            .await
            .expect("write");
        cache
            .write(&NodeTypeSchema::new("n8n-nodes-base.if", VersionSpec::Single(2.0)))
            .await
            .expect("write");

        let names = cache.list().await.expect("list");
        assert_eq!(names, vec!["@n8n/n8n-nodes-langchain.agent", "n8n-nodes-base.if"]);
    }

    #[tokio::test]
    async fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = SchemaCache::new(dir.path().join("absent"));

        assert!(cache.list().await.expect("list").is_empty());
        assert!(cache.read_all().await.expect("read_all").is_empty());
    }

    #[tokio::test]
    async fn read_all_ignores_other_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = SchemaCache::new(dir.path());
        cache
            .write(&NodeTypeSchema::new("n8n-nodes-base.set", VersionSpec::Single(3.4)))
            .await
            .expect("write");
        std::fs::write(dir.path().join("README.md"), "notes").expect("write readme");

        let schemas = cache.read_all().await.expect("read_all");
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].name, "n8n-nodes-base.set");
    }

    #[tokio::test]
    async fn malformed_schema_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("broken.json"), "{ not json").expect("write");
        let cache = SchemaCache::new(dir.path());

        let err = cache.read_all().await.unwrap_err();
        assert!(err.to_string().contains("invalid schema"));
    }

    #[tokio::test]
    async fn reading_unknown_type_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = SchemaCache::new(dir.path());

        let err = cache.read("n8n-nodes-base.nope").await.unwrap_err();
        assert!(err.to_string().contains("failed to read schema file"));
    }
}
