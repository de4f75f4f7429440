//! Recolor - Library for fanning color-templated SVGs out into palette variants
//!
//! This library provides functionality to:
//! - Load palette trees from JSON, JSON5 or TOML and flatten them to named colors
//! - Replace one literal target color in a source file with every palette color
//! - Write one output per color next to the source's relative location
//! - Drive whole projects from `recolor.toml`, optionally in watch mode

pub mod build;
pub mod cli;
pub mod config;
pub mod emit;
pub mod error;
pub mod palette;
pub mod path;
pub mod substitute;
pub mod transform;
pub mod watch;

pub use error::RecolorError;
pub use palette::{resolve, ColorSpec, Palette, ResolvedColor};
pub use transform::{create_transform, SourceFile, Transform};
