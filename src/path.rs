//! Source path decomposition and output path generation

use std::path::{Path, PathBuf};

/// A relative source path split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    /// Directory part, empty when the path has none
    pub dirname: PathBuf,
    /// File name without its extension
    pub basename: String,
    /// Extension including the leading `.`, empty when there is none
    pub extname: String,
}

/// Split a relative path into directory, base name and extension.
///
/// Only the last extension is split off, and dot-files have none:
///
/// ```
/// use recolor::path::split;
///
/// let parsed = split("icons/ui/arrow.svg");
/// assert_eq!(parsed.dirname.to_str(), Some("icons/ui"));
/// assert_eq!(parsed.basename, "arrow");
/// assert_eq!(parsed.extname, ".svg");
/// ```
pub fn split(relative: impl AsRef<Path>) -> ParsedPath {
    let relative = relative.as_ref();
    let dirname = relative.parent().map(Path::to_path_buf).unwrap_or_default();

    let basename = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extname = relative
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    ParsedPath { dirname, basename, extname }
}

impl ParsedPath {
    /// Directory the outputs for this source land in.
    pub fn output_dir(&self, out_dir: &Path) -> PathBuf {
        if self.dirname.as_os_str().is_empty() {
            out_dir.to_path_buf()
        } else {
            out_dir.join(&self.dirname)
        }
    }
}
