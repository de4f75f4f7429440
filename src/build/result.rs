//! Build result types.
//!
//! Contains types for representing the outcome of build operations.

use crate::transform::FileReport;
use std::path::PathBuf;
use std::time::Duration;

/// Status of a single source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    /// Every output was written
    Success,
    /// Nothing was written (dry run)
    Skipped,
    /// The file failed, with the first error's message
    Failed(String),
}

impl BuildStatus {
    /// Check if the status indicates success.
    pub fn is_success(&self) -> bool {
        matches!(self, BuildStatus::Success | BuildStatus::Skipped)
    }

    /// Check if the status indicates failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, BuildStatus::Failed(_))
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildStatus::Success => write!(f, "success"),
            BuildStatus::Skipped => write!(f, "skipped"),
            BuildStatus::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

/// Result of recoloring a single source file.
#[derive(Debug, Clone)]
pub struct FileResult {
    /// Source path, relative to the source directory
    pub source: PathBuf,
    /// Build status
    pub status: BuildStatus,
    /// Output files written (or planned, for a dry run)
    pub outputs: Vec<PathBuf>,
    /// Build duration
    pub duration: Duration,
    /// Every error message reported for the file
    pub errors: Vec<String>,
}

impl FileResult {
    /// Create a successful result.
    pub fn success(source: PathBuf, outputs: Vec<PathBuf>, duration: Duration) -> Self {
        Self { source, status: BuildStatus::Success, outputs, duration, errors: vec![] }
    }

    /// Create a skipped result listing the outputs that would be written.
    pub fn skipped(source: PathBuf, planned: Vec<PathBuf>) -> Self {
        Self {
            source,
            status: BuildStatus::Skipped,
            outputs: planned,
            duration: Duration::ZERO,
            errors: vec![],
        }
    }

    /// Create a failed result.
    pub fn failed(source: PathBuf, error: String, duration: Duration) -> Self {
        Self {
            source,
            status: BuildStatus::Failed(error.clone()),
            outputs: vec![],
            duration,
            errors: vec![error],
        }
    }

    /// Summarize a transform report.
    ///
    /// Outputs that were written before a write failure are kept.
    pub fn from_report(report: FileReport) -> Self {
        let errors: Vec<String> = report.errors.iter().map(|e| e.to_string()).collect();
        let status = match errors.first() {
            Some(first) => BuildStatus::Failed(first.clone()),
            None => BuildStatus::Success,
        };
        Self {
            source: report.source,
            status,
            outputs: report.outputs,
            duration: report.duration,
            errors,
        }
    }

    /// Check if this result is successful.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Result of a complete build run.
#[derive(Debug, Default)]
pub struct BuildResult {
    /// Results for each source file, in discovery order
    pub files: Vec<FileResult>,
    /// Total build duration
    pub total_duration: Duration,
}

impl BuildResult {
    /// Create a new empty build result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file result.
    pub fn add_result(&mut self, result: FileResult) {
        self.files.push(result);
    }

    /// Set the total duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.total_duration = duration;
        self
    }

    /// Get the number of successful files.
    pub fn success_count(&self) -> usize {
        self.files.iter().filter(|r| matches!(r.status, BuildStatus::Success)).count()
    }

    /// Get the number of skipped files.
    pub fn skipped_count(&self) -> usize {
        self.files.iter().filter(|r| matches!(r.status, BuildStatus::Skipped)).count()
    }

    /// Get the number of failed files.
    pub fn failed_count(&self) -> usize {
        self.files.iter().filter(|r| r.status.is_failure()).count()
    }

    /// Check if the overall build succeeded (no failures).
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// Get all outputs produced.
    pub fn all_outputs(&self) -> Vec<&PathBuf> {
        self.files.iter().flat_map(|r| r.outputs.iter()).collect()
    }

    /// Get failed file results.
    pub fn failures(&self) -> Vec<&FileResult> {
        self.files.iter().filter(|r| r.status.is_failure()).collect()
    }

    /// Format a summary of the build result.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        let success = self.success_count();
        let skipped = self.skipped_count();
        let failed = self.failed_count();
        let total = self.files.len();
        let outputs = self.all_outputs().len();

        if failed > 0 {
            lines.push(format!(
                "Build failed: {} succeeded, {} skipped, {} failed ({} total, {} outputs)",
                success, skipped, failed, total, outputs
            ));
            for file in self.failures() {
                lines.push(format!("  - {}: {}", file.source.display(), file.status));
                for extra in file.errors.iter().skip(1).take(5) {
                    lines.push(format!("      {}", extra));
                }
            }
        } else {
            lines.push(format!(
                "Build succeeded: {} recolored, {} skipped ({} total, {} outputs) in {:?}",
                success, skipped, total, outputs, self.total_duration
            ));
        }

        lines.join("\n")
    }
}
