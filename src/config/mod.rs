//! Configuration module for the recolor build
//!
//! Provides types and parsing for `recolor.toml` project configuration.

pub mod loader;
pub mod schema;

pub use loader::{default_config, load_config, load_palette, ConfigError};
pub use schema::*;
