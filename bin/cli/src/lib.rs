//! Command-line front end for the flowpress workflow compiler.

pub mod commands;
pub mod config;
pub mod error;
