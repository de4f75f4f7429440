//! Watch mode for automatic rebuilds on file changes
//!
//! Provides file system watching with debouncing for the `recolor build --watch`
//! command. Every relevant change triggers a full rebuild through the
//! [`BuildPipeline`].

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::build::{BuildContext, BuildPipeline, BuildResult};
use crate::config::schema::WatchConfig;

/// Error during watch mode
#[derive(Debug)]
pub enum WatchError {
    /// Failed to initialize file watcher
    WatcherInit(notify::Error),
    /// Failed to add watch path
    WatchPath(notify::Error),
    /// Channel receive error
    ChannelError(String),
    /// Source directory not found
    SourceNotFound(PathBuf),
}

impl std::fmt::Display for WatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchError::WatcherInit(e) => write!(f, "Failed to initialize file watcher: {}", e),
            WatchError::WatchPath(e) => write!(f, "Failed to watch path: {}", e),
            WatchError::ChannelError(msg) => write!(f, "Watch channel error: {}", msg),
            WatchError::SourceNotFound(path) => {
                write!(f, "Source directory not found: {}", path.display())
            }
        }
    }
}

impl std::error::Error for WatchError {}

/// Tracks sources with errors across build iterations for recovery detection
#[derive(Debug, Default)]
pub struct ErrorTracker {
    /// Sources that failed in the previous build
    files_with_errors: HashSet<PathBuf>,
}

impl ErrorTracker {
    /// Create a new error tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Update tracker with new build result, returns list of fixed files
    pub fn update(&mut self, result: &BuildResult) -> Vec<PathBuf> {
        let current: HashSet<PathBuf> =
            result.failures().into_iter().map(|f| f.source.clone()).collect();

        let mut fixed: Vec<PathBuf> =
            self.files_with_errors.difference(&current).cloned().collect();
        fixed.sort();

        self.files_with_errors = current;
        fixed
    }

    /// Forget every tracked error (e.g. after a build that never ran)
    pub fn clear(&mut self) {
        self.files_with_errors.clear();
    }

    /// Check if there are any tracked errors
    pub fn has_errors(&self) -> bool {
        !self.files_with_errors.is_empty()
    }

    /// Get the number of files with errors
    pub fn error_count(&self) -> usize {
        self.files_with_errors.len()
    }
}

/// Options for watch mode
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Build context every rebuild runs with
    pub context: BuildContext,
    /// Watch configuration (debounce, clear screen)
    pub config: WatchConfig,
}

impl WatchOptions {
    /// Watch options taking the `[watch]` section from the context's config
    pub fn new(context: BuildContext) -> Self {
        let config = context.config().watch.clone();
        Self { context, config }
    }
}

/// Clear the terminal screen
fn clear_screen() {
    // ANSI escape code to clear screen and move cursor to top-left
    print!("\x1B[2J\x1B[1;1H");
}

/// Format duration for display
fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}

/// Get current timestamp for logging
fn timestamp() -> String {
    use std::time::SystemTime;
    let now = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
    let secs = now.as_secs() % 86400; // seconds since midnight
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Perform a single build iteration and report it.
///
/// Called on startup and after each relevant change. A build that cannot
/// start (missing palette, bad glob) is reported and watching continues.
pub fn do_build(options: &WatchOptions, tracker: &mut ErrorTracker) -> Option<BuildResult> {
    println!("[{}] Building...", timestamp());
    let pipeline = BuildPipeline::new(options.context.clone());
    match pipeline.build() {
        Ok(result) => {
            let fixed = tracker.update(&result);
            print_build_result(&result, &fixed);
            Some(result)
        }
        Err(e) => {
            tracker.clear();
            eprintln!("[{}] Error: {}", timestamp(), e);
            None
        }
    }
}

/// Watch for file changes and rebuild automatically.
///
/// This function blocks and runs until interrupted (Ctrl+C). The source
/// directory is watched recursively; a palette file outside it is watched
/// as well.
///
/// # Example
/// ```ignore
/// let options = WatchOptions::new(BuildContext::new(config, project_root));
/// watch_and_rebuild(options)?;
/// ```
pub fn watch_and_rebuild(options: WatchOptions) -> Result<(), WatchError> {
    let src_dir = options.context.src_dir();
    if !src_dir.exists() {
        return Err(WatchError::SourceNotFound(src_dir));
    }
    let out_dir = options.context.out_dir();

    let (tx, rx) = channel();

    let debounce_duration = Duration::from_millis(options.config.debounce_ms as u64);
    let mut debouncer = new_debouncer(debounce_duration, tx).map_err(WatchError::WatcherInit)?;

    debouncer.watcher().watch(&src_dir, RecursiveMode::Recursive).map_err(WatchError::WatchPath)?;
    if let Some(palette) = options.context.palette_path() {
        if !palette.starts_with(&src_dir) {
            debouncer
                .watcher()
                .watch(&palette, RecursiveMode::NonRecursive)
                .map_err(WatchError::WatchPath)?;
        }
    }

    let mut error_tracker = ErrorTracker::new();

    if options.config.clear_screen {
        clear_screen();
    }
    do_build(&options, &mut error_tracker);
    println!("[{}] Watching {} for changes...", timestamp(), src_dir.display());

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant_changes: Vec<_> = events
                    .iter()
                    .filter(|e| {
                        matches!(e.kind, DebouncedEventKind::Any)
                            && is_relevant_file(&e.path, &out_dir)
                    })
                    .collect();

                if relevant_changes.is_empty() {
                    continue;
                }

                for event in &relevant_changes {
                    if let Some(name) = event.path.file_name() {
                        println!("[{}] Changed: {}", timestamp(), name.to_string_lossy());
                    }
                    tracing::debug!(path = %event.path.display(), "change detected");
                }

                if options.config.clear_screen {
                    clear_screen();
                }

                do_build(&options, &mut error_tracker);
                println!("[{}] Watching {} for changes...", timestamp(), src_dir.display());
            }
            Ok(Err(error)) => {
                // Watch error (non-fatal) - log but continue watching
                eprintln!("[{}] Watch error: {:?}", timestamp(), error);
                eprintln!("[{}] Continuing to watch...", timestamp());
            }
            Err(e) => {
                return Err(WatchError::ChannelError(e.to_string()));
            }
        }
    }
}

/// Check if a changed file should trigger a rebuild.
///
/// Sources and palette files count; anything under the output directory is
/// ignored so a build never retriggers itself.
fn is_relevant_file(path: &Path, out_dir: &Path) -> bool {
    if path.starts_with(out_dir) {
        return false;
    }
    match path.extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy().to_lowercase();
            matches!(ext.as_str(), "svg" | "json" | "json5" | "toml")
        }
        None => false,
    }
}

/// Print build result to console with fixed file notifications
fn print_build_result(result: &BuildResult, fixed_files: &[PathBuf]) {
    for fixed in fixed_files {
        println!("[{}] Fixed: {}", timestamp(), fixed.display());
    }

    if result.is_success() {
        println!(
            "[{}] Build complete ({}) - Files: {} | Outputs: {}",
            timestamp(),
            format_duration(result.total_duration),
            result.files.len(),
            result.all_outputs().len()
        );
    } else {
        let error_count = result.failed_count();
        println!(
            "[{}] Build failed ({}) - {} error{}",
            timestamp(),
            format_duration(result.total_duration),
            error_count,
            if error_count == 1 { "" } else { "s" }
        );

        for failure in result.failures() {
            for error in &failure.errors {
                eprintln!("[{}] Error in {}: {}", timestamp(), failure.source.display(), error);
            }
        }
    }
}
