//! Run command implementation (one-off recolor of explicit files)

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::palette::Palette;
use crate::transform::{SourceFile, Transform};

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Relative path of `input`, against `base` or else its own directory.
fn relative_to(base: Option<&Path>, input: &Path) -> PathBuf {
    match base.and_then(|b| input.strip_prefix(b).ok()) {
        Some(rel) => rel.to_path_buf(),
        None => input.file_name().map(PathBuf::from).unwrap_or_else(|| input.to_path_buf()),
    }
}

/// Execute the run command
pub fn run_files(
    inputs: &[PathBuf],
    target: &str,
    palette_path: &Path,
    out: &Path,
    base: Option<&Path>,
    jobs: usize,
    parents: bool,
) -> ExitCode {
    if target.is_empty() {
        eprintln!("Error: --target must not be empty");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }
    if jobs == 0 {
        eprintln!("Error: --jobs must be at least 1");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let palette = match Palette::from_file(palette_path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error loading palette: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut failed = 0usize;
    let mut files = Vec::with_capacity(inputs.len());
    for input in inputs {
        if input.is_dir() {
            files.push(SourceFile::null(relative_to(base, input)));
            continue;
        }
        let root = match base {
            Some(b) => b.to_path_buf(),
            None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        match SourceFile::read(&root, input) {
            Ok(file) => files.push(file),
            Err(e) => {
                eprintln!("Error: {}", e);
                failed += 1;
            }
        }
    }

    let transform =
        Transform::new(target, palette, out).with_jobs(jobs).with_recursive_dirs(parents);

    let mut written = 0usize;
    for (file, report) in transform.pipe(files) {
        for output in &report.outputs {
            println!("{}", output.display());
        }
        written += report.outputs.len();
        if !report.is_success() {
            failed += 1;
            for error in &report.errors {
                eprintln!("Error in {}: {}", file.relative.display(), error);
            }
        }
    }

    if failed > 0 {
        eprintln!("{} file(s) failed, {} output(s) written", failed, written);
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}
