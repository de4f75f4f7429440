//! Configuration schema types for `recolor.toml`
//!
//! Defines the structure and validation rules for a recolor project.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::palette::ColorSpec;

/// Project metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name (required)
    pub name: String,
    /// Source directory holding the color-templated SVGs
    #[serde(default = "default_src")]
    pub src: PathBuf,
    /// Output directory for recolored files
    #[serde(default = "default_out")]
    pub out: PathBuf,
}

fn default_src() -> PathBuf {
    PathBuf::from("svg")
}

fn default_out() -> PathBuf {
    PathBuf::from("dist")
}

/// The `[recolor]` section: what to replace and with which colors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecolorSection {
    /// Literal color token to replace in every source
    pub target: String,
    /// Glob patterns, relative to the source directory
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
    /// Palette file (.json, .json5 or .toml), relative to the project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<PathBuf>,
    /// Inline palette nodes, appended after the palette file's
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<ColorSpec>,
    /// Worker threads per file fan-out (defaults to available parallelism)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
    /// Stop the build at the first failed source file
    #[serde(default)]
    pub fail_fast: bool,
    /// Create every missing ancestor of an output directory
    #[serde(default)]
    pub recursive_dirs: bool,
}

fn default_sources() -> Vec<String> {
    vec!["**/*.svg".to_string()]
}

impl Default for RecolorSection {
    fn default() -> Self {
        Self {
            target: String::new(),
            sources: default_sources(),
            palette: None,
            colors: vec![],
            jobs: None,
            fail_fast: false,
            recursive_dirs: false,
        }
    }
}

/// Watch mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Debounce delay in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u32,
    /// Clear terminal between rebuilds
    #[serde(default = "default_true")]
    pub clear_screen: bool,
}

fn default_debounce_ms() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 100, clear_screen: true }
    }
}

/// Complete recolor.toml configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecolorConfig {
    /// Project metadata (required)
    pub project: ProjectConfig,
    /// Recolor settings
    #[serde(default)]
    pub recolor: RecolorSection,
    /// Watch mode settings
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "recolor.target")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "recolor.toml: '{}' {}", self.field, self.message)
    }
}

impl RecolorConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.project.name.is_empty() {
            errors.push(ConfigValidationError {
                field: "project.name".to_string(),
                message: "must be a non-empty string".to_string(),
            });
        }

        if self.recolor.target.is_empty() {
            errors.push(ConfigValidationError {
                field: "recolor.target".to_string(),
                message: "must be a non-empty color token".to_string(),
            });
        }

        if self.recolor.sources.is_empty() {
            errors.push(ConfigValidationError {
                field: "recolor.sources".to_string(),
                message: "must contain at least one glob pattern".to_string(),
            });
        }

        for (i, pattern) in self.recolor.sources.iter().enumerate() {
            if let Err(e) = glob::Pattern::new(pattern) {
                errors.push(ConfigValidationError {
                    field: format!("recolor.sources[{}]", i),
                    message: format!("is not a valid glob pattern: {}", e),
                });
            }
        }

        if self.recolor.palette.is_none() && self.recolor.colors.is_empty() {
            errors.push(ConfigValidationError {
                field: "recolor.palette".to_string(),
                message: "or recolor.colors must be set".to_string(),
            });
        }

        if self.recolor.jobs == Some(0) {
            errors.push(ConfigValidationError {
                field: "recolor.jobs".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Worker threads to use per file, at least one.
    pub fn effective_jobs(&self) -> usize {
        self.recolor
            .jobs
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
            .max(1)
    }
}
