//! Per-file recolor transform
//!
//! A [`Transform`] is built once from a target color, a palette and an output
//! directory, then fed source files one at a time. Each file moves through
//! `Received -> Resolving -> FanningOut -> Complete | Failed` and settles with a
//! single [`FileReport`]. The source file itself is handed back untouched so a
//! host pipeline can keep passing it downstream.
//!
//! # Example
//!
//! ```no_run
//! use recolor::palette::ColorSpec;
//! use recolor::transform::{SourceFile, Transform};
//!
//! let transform = Transform::new("#FF0000", vec![ColorSpec::leaf("blue", "#0000FF")], "dist");
//! let file = SourceFile::buffered("icon.svg", br##"<svg fill="#FF0000"/>"##.to_vec());
//!
//! let report = transform.process(&file);
//! assert!(report.is_success());
//! ```

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::emit::FileEmitter;
use crate::error::RecolorError;
use crate::palette::{Palette, ResolvedColor};
use crate::path::split;
use crate::substitute::Substitutor;

/// Contents of a source file.
pub enum Contents {
    /// Fully buffered bytes
    Buffer(Vec<u8>),
    /// A chunked reader; not supported by the transform
    Stream(Box<dyn Read + Send>),
    /// No contents at all (e.g. a directory entry)
    Null,
}

impl fmt::Debug for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contents::Buffer(bytes) => write!(f, "Buffer({} bytes)", bytes.len()),
            Contents::Stream(_) => write!(f, "Stream"),
            Contents::Null => write!(f, "Null"),
        }
    }
}

/// A source file as delivered by the host pipeline.
#[derive(Debug)]
pub struct SourceFile {
    /// Path relative to the source root; decides the output location
    pub relative: PathBuf,
    pub contents: Contents,
}

impl SourceFile {
    pub fn buffered(relative: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self { relative: relative.into(), contents: Contents::Buffer(bytes) }
    }

    pub fn streamed(relative: impl Into<PathBuf>, reader: Box<dyn Read + Send>) -> Self {
        Self { relative: relative.into(), contents: Contents::Stream(reader) }
    }

    pub fn null(relative: impl Into<PathBuf>) -> Self {
        Self { relative: relative.into(), contents: Contents::Null }
    }

    /// Read `path` into a buffered source file relative to `base`.
    ///
    /// A path outside `base` keeps only its file name.
    pub fn read(base: &Path, path: &Path) -> Result<Self, RecolorError> {
        let bytes = fs::read(path)
            .map_err(|source| RecolorError::Read { path: path.to_path_buf(), source })?;
        let relative = match path.strip_prefix(base) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => path.file_name().map(PathBuf::from).unwrap_or_else(|| path.to_path_buf()),
        };
        Ok(Self::buffered(relative, bytes))
    }

    pub fn is_buffer(&self) -> bool {
        matches!(self.contents, Contents::Buffer(_))
    }

    pub fn is_stream(&self) -> bool {
        matches!(self.contents, Contents::Stream(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self.contents, Contents::Null)
    }
}

/// Where a source file is in its transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformState {
    Received,
    Resolving,
    FanningOut,
    Complete,
    Failed,
}

impl fmt::Display for TransformState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformState::Received => write!(f, "received"),
            TransformState::Resolving => write!(f, "resolving"),
            TransformState::FanningOut => write!(f, "fanning out"),
            TransformState::Complete => write!(f, "complete"),
            TransformState::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of transforming one source file.
#[derive(Debug)]
pub struct FileReport {
    /// Relative path of the source file
    pub source: PathBuf,
    /// Final state, `Complete` or `Failed` once settled
    pub state: TransformState,
    /// Outputs written, in palette order
    pub outputs: Vec<PathBuf>,
    /// The fatal error, or every failed write in palette order
    pub errors: Vec<RecolorError>,
    pub duration: Duration,
}

impl FileReport {
    fn new(source: PathBuf) -> Self {
        Self {
            source,
            state: TransformState::Received,
            outputs: vec![],
            errors: vec![],
            duration: Duration::ZERO,
        }
    }

    fn fail(mut self, error: RecolorError, start: Instant) -> Self {
        tracing::error!(
            source = %self.source.display(),
            state = %self.state,
            %error,
            "transform failed"
        );
        self.errors.push(error);
        self.state = TransformState::Failed;
        self.duration = start.elapsed();
        self
    }

    fn settle(mut self, start: Instant) -> Self {
        self.state =
            if self.errors.is_empty() { TransformState::Complete } else { TransformState::Failed };
        self.duration = start.elapsed();
        self
    }

    pub fn is_success(&self) -> bool {
        self.state == TransformState::Complete
    }

    /// The first error reported for this file.
    pub fn error(&self) -> Option<&RecolorError> {
        self.errors.first()
    }

    /// Collapse into the written outputs or the first error.
    pub fn into_result(mut self) -> Result<Vec<PathBuf>, RecolorError> {
        if self.errors.is_empty() {
            Ok(self.outputs)
        } else {
            Err(self.errors.swap_remove(0))
        }
    }
}

/// Recolors source files into one output per palette color.
pub struct Transform {
    substitutor: Substitutor,
    palette: Palette,
    out_dir: PathBuf,
    recursive_dirs: bool,
    pool: Option<ThreadPool>,
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("target", &self.substitutor.target())
            .field("palette", &self.palette)
            .field("out_dir", &self.out_dir)
            .field("recursive_dirs", &self.recursive_dirs)
            .field("jobs", &self.jobs())
            .finish()
    }
}

/// Build a transform that replaces `target_color` with every palette color.
pub fn create_transform(
    target_color: &str,
    palette: impl Into<Palette>,
    out_dir: impl Into<PathBuf>,
) -> Transform {
    Transform::new(target_color, palette, out_dir)
}

impl Transform {
    /// Create a transform that writes outputs one color at a time.
    pub fn new(
        target_color: &str,
        palette: impl Into<Palette>,
        out_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            substitutor: Substitutor::new(target_color),
            palette: palette.into(),
            out_dir: out_dir.into(),
            recursive_dirs: false,
            pool: None,
        }
    }

    /// Write the outputs of each file on up to `jobs` threads.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.pool = if jobs <= 1 {
            None
        } else {
            match ThreadPoolBuilder::new().num_threads(jobs).build() {
                Ok(pool) => Some(pool),
                Err(e) => {
                    tracing::warn!(jobs, error = %e, "failed to start worker pool, writing inline");
                    None
                }
            }
        };
        self
    }

    /// Create missing ancestors of each output directory as well.
    pub fn with_recursive_dirs(mut self, recursive_dirs: bool) -> Self {
        self.recursive_dirs = recursive_dirs;
        self
    }

    pub fn jobs(&self) -> usize {
        self.pool.as_ref().map_or(1, ThreadPool::current_num_threads)
    }

    pub fn target(&self) -> &str {
        self.substitutor.target()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Transform one source file.
    ///
    /// Streamed input, a malformed palette and an uncreatable output directory
    /// fail the file before anything is written. A failed write only fails its
    /// own color; the remaining colors are still written.
    #[tracing::instrument(skip(self, file), fields(source = %file.relative.display()))]
    pub fn process(&self, file: &SourceFile) -> FileReport {
        let start = Instant::now();
        let mut report = FileReport::new(file.relative.clone());

        let content = match &file.contents {
            Contents::Buffer(bytes) => bytes.as_slice(),
            Contents::Null => return report.settle(start),
            Contents::Stream(_) => {
                let error = RecolorError::StreamingNotSupported { path: file.relative.clone() };
                return report.fail(error, start);
            }
        };

        report.state = TransformState::Resolving;
        let colors = match self.palette.resolve() {
            Ok(colors) => colors,
            Err(e) => return report.fail(e.into(), start),
        };

        report.state = TransformState::FanningOut;
        if colors.is_empty() {
            return report.settle(start);
        }

        let parsed = split(&file.relative);
        let emitter = FileEmitter::for_source(&self.out_dir, &parsed)
            .with_recursive_dirs(self.recursive_dirs);
        if let Err(e) = emitter.prepare() {
            return report.fail(e, start);
        }

        for result in self.fan_out(content, &colors, &emitter) {
            match result {
                Ok(path) => report.outputs.push(path),
                Err(e) => {
                    tracing::warn!(error = %e, "output not written");
                    report.errors.push(e);
                }
            }
        }

        let report = report.settle(start);
        tracing::debug!(
            outputs = report.outputs.len(),
            failed = report.errors.len(),
            state = %report.state,
            "file settled"
        );
        report
    }

    /// Emit every color against the same original buffer.
    ///
    /// Results come back in palette order whatever order the writes finish in.
    fn fan_out(
        &self,
        content: &[u8],
        colors: &[ResolvedColor],
        emitter: &FileEmitter,
    ) -> Vec<Result<PathBuf, RecolorError>> {
        let emit_one = |color: &ResolvedColor| emitter.emit(content, color, &self.substitutor);

        match &self.pool {
            Some(pool) if colors.len() > 1 => {
                pool.install(|| colors.par_iter().map(emit_one).collect())
            }
            _ => colors.iter().map(emit_one).collect(),
        }
    }

    /// Output paths `process` would write for a source, without writing.
    pub fn plan(&self, relative: &Path) -> Result<Vec<PathBuf>, RecolorError> {
        let colors = self.palette.resolve()?;
        let emitter = FileEmitter::for_source(&self.out_dir, &split(relative));
        Ok(colors.iter().map(|color| emitter.output_path(color)).collect())
    }

    /// Transform every file and hand each one back with its report.
    pub fn pipe<'a, I>(&'a self, files: I) -> impl Iterator<Item = (SourceFile, FileReport)> + 'a
    where
        I: IntoIterator<Item = SourceFile>,
        I::IntoIter: 'a,
    {
        files.into_iter().map(move |file| {
            let report = self.process(&file);
            (file, report)
        })
    }
}
