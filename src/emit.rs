//! Writing one recolored output per palette color

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::RecolorError;
use crate::palette::ResolvedColor;
use crate::path::ParsedPath;
use crate::substitute::Substitutor;

/// Writes the recolored variants of one source file.
#[derive(Debug, Clone)]
pub struct FileEmitter {
    /// Directory every variant is written into
    out_dir: PathBuf,
    /// Source file name without extension
    basename: String,
    /// Source extension including the leading `.`
    extname: String,
    /// Create missing ancestors of `out_dir` too
    recursive_dirs: bool,
}

impl FileEmitter {
    pub fn new(out_dir: impl Into<PathBuf>, basename: &str, extname: &str) -> Self {
        Self {
            out_dir: out_dir.into(),
            basename: basename.to_string(),
            extname: extname.to_string(),
            recursive_dirs: false,
        }
    }

    /// Emitter for a split source path under the output root.
    pub fn for_source(out_root: &Path, parsed: &ParsedPath) -> Self {
        Self::new(parsed.output_dir(out_root), &parsed.basename, &parsed.extname)
    }

    /// Create the whole ancestor chain of the output directory, not just
    /// the directory itself.
    pub fn with_recursive_dirs(mut self, recursive_dirs: bool) -> Self {
        self.recursive_dirs = recursive_dirs;
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// `{out_dir}/{basename}-{color}{extname}`
    pub fn output_path(&self, color: &ResolvedColor) -> PathBuf {
        output_path(&self.out_dir, &self.basename, &self.extname, color)
    }

    /// Make sure the output directory exists.
    pub fn prepare(&self) -> Result<(), RecolorError> {
        ensure_dir(&self.out_dir, self.recursive_dirs)
            .map_err(|source| RecolorError::DirectoryCreate { path: self.out_dir.clone(), source })
    }

    /// Write `content` with the target replaced by `color`'s value.
    ///
    /// The output directory must already exist, see [`FileEmitter::prepare`].
    pub fn emit(
        &self,
        content: &[u8],
        color: &ResolvedColor,
        substitutor: &Substitutor,
    ) -> Result<PathBuf, RecolorError> {
        let path = self.output_path(color);
        let recolored = substitutor.apply(content, &color.value);

        fs::write(&path, recolored)
            .map_err(|source| RecolorError::Write { path: path.clone(), source })?;

        tracing::debug!(path = %path.display(), color = %color.name, "wrote output");
        Ok(path)
    }
}

/// Output path for one color of a source file.
pub fn output_path(
    out_dir: &Path,
    basename: &str,
    extname: &str,
    color: &ResolvedColor,
) -> PathBuf {
    out_dir.join(format!("{}-{}{}", basename, color.name, extname))
}

/// Create `dir` if it is missing.
///
/// Without `recursive` only `dir` itself is created, so a missing parent is an
/// error. A directory that appears between the check and the create (another
/// writer got there first) is accepted.
pub fn ensure_dir(dir: &Path, recursive: bool) -> io::Result<()> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }

    let created = if recursive { fs::create_dir_all(dir) } else { fs::create_dir(dir) };
    match created {
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn color(name: &str, value: &str) -> ResolvedColor {
        ResolvedColor { name: name.to_string(), value: value.to_string() }
    }

    #[test]
    fn test_output_path() {
        let emitter = FileEmitter::new("dist/ui", "icon", ".svg");
        assert_eq!(
            emitter.output_path(&color("brand-blue", "#00F")),
            PathBuf::from("dist/ui/icon-brand-blue.svg")
        );
    }

    #[test]
    fn test_emit_writes_substituted_content() {
        let temp = TempDir::new().unwrap();
        let emitter = FileEmitter::new(temp.path(), "icon", ".svg");
        let substitutor = Substitutor::new("#F00");

        let path =
            emitter.emit(b"<rect fill=\"#F00\"/>", &color("blue", "#00F"), &substitutor).unwrap();

        assert_eq!(path, temp.path().join("icon-blue.svg"));
        assert_eq!(fs::read(&path).unwrap(), b"<rect fill=\"#00F\"/>".to_vec());
    }

    #[test]
    fn test_emit_into_missing_dir_is_write_error() {
        let temp = TempDir::new().unwrap();
        let emitter = FileEmitter::new(temp.path().join("missing"), "icon", ".svg");
        let err =
            emitter.emit(b"", &color("blue", "#00F"), &Substitutor::new("#F00")).unwrap_err();
        assert!(matches!(err, RecolorError::Write { .. }));
    }

    #[test]
    fn test_prepare_creates_only_immediate_dir() {
        let temp = TempDir::new().unwrap();
        let ok = FileEmitter::new(temp.path().join("dist"), "icon", ".svg");
        ok.prepare().unwrap();
        assert!(temp.path().join("dist").is_dir());

        let nested = FileEmitter::new(temp.path().join("a/b/c"), "icon", ".svg");
        let err = nested.prepare().unwrap_err();
        assert!(matches!(err, RecolorError::DirectoryCreate { .. }));
        assert!(!temp.path().join("a").exists());
    }

    #[test]
    fn test_prepare_recursive() {
        let temp = TempDir::new().unwrap();
        let nested =
            FileEmitter::new(temp.path().join("a/b/c"), "icon", ".svg").with_recursive_dirs(true);
        nested.prepare().unwrap();
        assert!(temp.path().join("a/b/c").is_dir());
    }

    #[test]
    fn test_ensure_dir_existing_is_ok() {
        let temp = TempDir::new().unwrap();
        ensure_dir(temp.path(), false).unwrap();
        ensure_dir(Path::new(""), false).unwrap();
    }

    #[test]
    fn test_for_source_joins_relative_dir() {
        let parsed = crate::path::split("ui/icon.svg");
        let emitter = FileEmitter::for_source(Path::new("dist"), &parsed);
        assert_eq!(emitter.out_dir(), Path::new("dist/ui"));
        assert_eq!(
            emitter.output_path(&color("red", "#f00")),
            PathBuf::from("dist/ui/icon-red.svg")
        );

        let bare = FileEmitter::for_source(Path::new("dist"), &crate::path::split("Makefile"));
        assert_eq!(bare.output_path(&color("red", "#f00")), PathBuf::from("dist/Makefile-red"));
    }
}
