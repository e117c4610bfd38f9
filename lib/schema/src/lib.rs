//! Node-type schema records for flowpress.
//!
//! This crate provides:
//!
//! - **Schema Types**: the subset of the platform's node-type catalog entry the compiler reads
//! - **Schema Sources**: an async trait for bulk-reading schema records
//! - **Schema Cache**: a directory of `<type-name>.json` files persisted by the sync tooling

pub mod cache;
pub mod error;
pub mod source;
pub mod types;

pub use cache::SchemaCache;
pub use error::SchemaError;
pub use source::{SchemaSource, StaticSchemas};
pub use types::{NodeTypeSchema, VersionSpec};
