//! CLI configuration.
//!
//! Loaded via the `config` crate from `FLOWPRESS__*` environment variables,
//! e.g. `FLOWPRESS__SCHEMA_DIR=./schemas` or
//! `FLOWPRESS__LAYOUT__COLUMN_SPACING=250`.

use flowpress_compiler::LayoutConfig;
use serde::Deserialize;
use std::path::PathBuf;

const ENV_PREFIX: &str = "FLOWPRESS";

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CliConfig {
    /// Directory of cached node-type schemas.
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,

    /// Canvas grid for compiled documents.
    #[serde(default)]
    pub layout: LayoutConfig,
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from("schemas")
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            schema_dir: default_schema_dir(),
            layout: LayoutConfig::default(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn from_environment(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
