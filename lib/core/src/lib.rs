//! Core types shared by the flowpress crates.
//!
//! Node identifiers live here so the compiler and any deployment tooling
//! agree on their generation and text form.

pub mod id;

pub use id::{NodeId, ParseIdError};
