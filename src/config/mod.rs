//! Configuration model for the listings pipeline.
//!
//! This module defines the Config struct that represents `listings.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for optional fields, and validation of config values.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use model::{Config, ValidationSettings};
pub use operations::DEFAULT_CONFIG_FILE;
pub use types::MissingGroupPolicy;
