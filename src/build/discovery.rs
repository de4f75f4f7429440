//! Source file discovery for the build system.
//!
//! Finds the color-templated sources matching the `recolor.sources` glob
//! patterns under the source directory.

use crate::build::BuildContext;
use glob::glob;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Error during source discovery.
#[derive(Debug)]
pub enum DiscoveryError {
    /// Invalid glob pattern
    InvalidPattern(String, glob::PatternError),
    /// Source directory does not exist
    SourceNotFound(PathBuf),
}

impl std::fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryError::InvalidPattern(pattern, err) => {
                write!(f, "Invalid glob pattern '{}': {}", pattern, err)
            }
            DiscoveryError::SourceNotFound(dir) => {
                write!(f, "Source directory not found: {}", dir.display())
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiscoveryError::InvalidPattern(_, err) => Some(err),
            DiscoveryError::SourceNotFound(_) => None,
        }
    }
}

/// Discover files matching a glob pattern.
///
/// # Arguments
/// - `base_dir` - Base directory to resolve patterns from
/// - `pattern` - Glob pattern to match
///
/// # Returns
/// Sorted list of matching regular files.
pub fn discover_files(base_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
    let full_pattern = base_dir.join(pattern);
    let pattern_str = full_pattern.to_string_lossy();

    let paths =
        glob(&pattern_str).map_err(|e| DiscoveryError::InvalidPattern(pattern.to_string(), e))?;

    let mut files = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    files.push(path);
                }
            }
            Err(e) => {
                // Unreadable entries are skipped, the rest of the walk continues
                tracing::warn!(error = %e, "error reading path during discovery");
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Discover all sources from the configured patterns.
///
/// Returns a sorted, deduplicated list. Files inside the output directory are
/// left out so a build never recolors its own outputs.
pub fn discover_sources(ctx: &BuildContext) -> Result<Vec<PathBuf>, DiscoveryError> {
    let src_dir = ctx.src_dir();
    if !src_dir.is_dir() {
        return Err(DiscoveryError::SourceNotFound(src_dir));
    }

    let out_dir = ctx.out_dir();
    let mut all_files = BTreeSet::new();
    for pattern in &ctx.config().recolor.sources {
        let files = discover_files(&src_dir, pattern)?;
        all_files.extend(files.into_iter().filter(|f| !f.starts_with(&out_dir)));
    }

    Ok(all_files.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<svg/>").unwrap();
    }

    #[test]
    fn test_discover_files_sorted() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("b.svg"));
        touch(&temp.path().join("a.svg"));
        touch(&temp.path().join("notes.txt"));

        let files = discover_files(temp.path(), "*.svg").unwrap();
        assert_eq!(files, vec![temp.path().join("a.svg"), temp.path().join("b.svg")]);
    }

    #[test]
    fn test_discover_files_skips_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("folder.svg")).unwrap();

        let files = discover_files(temp.path(), "*.svg").unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_discover_files_invalid_pattern() {
        let temp = TempDir::new().unwrap();
        let err = discover_files(temp.path(), "[unclosed").unwrap_err();
        assert!(matches!(err, DiscoveryError::InvalidPattern(..)));
    }

    #[test]
    fn test_discover_sources_dedups_and_skips_out_dir() {
        let temp = TempDir::new().unwrap();
        let mut config = default_config();
        config.project.src = PathBuf::from(".");
        config.project.out = PathBuf::from("dist");
        config.recolor.sources = vec!["**/*.svg".to_string(), "ui/*.svg".to_string()];

        touch(&temp.path().join("ui/arrow.svg"));
        touch(&temp.path().join("logo.svg"));
        touch(&temp.path().join("dist/logo-blue.svg"));

        let ctx = BuildContext::new(config, temp.path().to_path_buf());
        let files = discover_sources(&ctx).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| !f.ends_with("logo-blue.svg")));
    }

    #[test]
    fn test_discover_sources_missing_src_dir() {
        let temp = TempDir::new().unwrap();
        let ctx = BuildContext::new(default_config(), temp.path().to_path_buf());

        let err = discover_sources(&ctx).unwrap_err();
        assert!(matches!(err, DiscoveryError::SourceNotFound(_)));
        assert!(err.to_string().starts_with("Source directory not found"));
    }
}
