//! Build pipeline module for recolor
//!
//! Drives a whole project through the recolor transform: every source that
//! matches the configured globs is fanned out into one SVG per palette color.
//!
//! # Overview
//!
//! The build pipeline consists of:
//! - **Discovery**: Find source files using glob patterns from config
//! - **Execution**: Recolor each source into the output directory
//! - **Reporting**: Collect a per-file result and a build summary
//!
//! # Example
//!
//! ```ignore
//! use recolor::build::{BuildContext, BuildPipeline};
//! use recolor::config::load_config;
//!
//! let config = load_config(None)?;
//! let context = BuildContext::new(config, project_root);
//! let pipeline = BuildPipeline::new(context);
//!
//! let result = pipeline.build()?;
//! println!("{}", result.summary());
//! ```

pub mod context;
pub mod discovery;
pub mod pipeline;
pub mod result;

pub use context::*;
pub use discovery::*;
pub use pipeline::*;
pub use result::*;
