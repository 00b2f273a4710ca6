//! Configuration loading, merging, and overrides for the wikidex CLI.

pub mod config;
pub mod error;
pub mod templates;

pub use config::{Config, ExportConfig};
pub use error::ConfigError;
