//! Error types for the recolor transform

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::palette::PaletteError;

/// Error raised while transforming a single source file.
///
/// Every variant except [`RecolorError::Write`] is fatal for the file it was
/// raised for: no outputs are written. Write errors are reported per color and
/// do not stop sibling outputs from being written.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecolorError {
    /// A palette node has neither a literal value nor a child sequence
    #[error("Malformed palette: {0}")]
    MalformedPalette(#[from] PaletteError),
    /// The source file is a stream rather than a buffer
    #[error("Streaming not supported: {}", path.display())]
    StreamingNotSupported { path: PathBuf },
    /// Writing one recolored output failed
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The output directory for a source file could not be created
    #[error("Failed to create output directory {}: {source}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A source file could not be read into a buffer
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RecolorError {
    /// Whether this error aborts the whole source file.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RecolorError::Write { .. })
    }
}
