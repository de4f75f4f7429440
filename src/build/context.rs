//! Build context containing configuration and state for a build.

use crate::config::RecolorConfig;
use std::path::{Path, PathBuf};

/// Build context containing configuration and paths for a build operation.
///
/// Paths in the configuration are relative to the project root (the
/// directory holding `recolor.toml`); the context resolves them.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// The loaded configuration
    config: RecolorConfig,
    /// Project root directory (where recolor.toml is located)
    project_root: PathBuf,
    /// Whether to run in verbose mode
    verbose: bool,
}

impl BuildContext {
    /// Create a new build context.
    pub fn new(config: RecolorConfig, project_root: PathBuf) -> Self {
        Self { config, project_root, verbose: false }
    }

    /// Get the configuration.
    pub fn config(&self) -> &RecolorConfig {
        &self.config
    }

    /// Get the project root directory.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the source directory (resolved to absolute path).
    pub fn src_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.project.src)
    }

    /// Get the output directory (resolved to absolute path).
    pub fn out_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.project.out)
    }

    /// Palette file, if one is configured (resolved to absolute path).
    pub fn palette_path(&self) -> Option<PathBuf> {
        self.config.recolor.palette.as_deref().map(|p| self.resolve_path(p))
    }

    /// Whether verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Whether the build stops at the first failed file.
    pub fn is_fail_fast(&self) -> bool {
        self.config.recolor.fail_fast
    }

    /// Worker threads per file fan-out.
    pub fn jobs(&self) -> usize {
        self.config.effective_jobs()
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Resolve a path relative to the project root.
    ///
    /// If the path is absolute, returns it unchanged.
    /// If relative, joins it with the project root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        crate::config::loader::resolve_path(&self.project_root, path)
    }
}
