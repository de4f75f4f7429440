//! Build pipeline orchestration.
//!
//! The pipeline loads the palette, discovers the sources and pushes each one
//! through a single [`Transform`].

use crate::build::{discover_sources, BuildContext, BuildResult, FileResult};
use crate::config::{load_palette, ConfigError};
use crate::transform::{SourceFile, Transform};
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Error during build execution.
#[derive(Debug)]
pub enum BuildError {
    /// Discovery error
    Discovery(crate::build::DiscoveryError),
    /// Configuration or palette error
    Config(ConfigError),
    /// IO error
    Io(std::io::Error),
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::Discovery(e) => write!(f, "Discovery error: {}", e),
            BuildError::Config(e) => write!(f, "Config error: {}", e),
            BuildError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Discovery(e) => Some(e),
            BuildError::Config(e) => Some(e),
            BuildError::Io(e) => Some(e),
        }
    }
}

impl From<crate::build::DiscoveryError> for BuildError {
    fn from(e: crate::build::DiscoveryError) -> Self {
        BuildError::Discovery(e)
    }
}

impl From<ConfigError> for BuildError {
    fn from(e: ConfigError) -> Self {
        BuildError::Config(e)
    }
}

impl From<std::io::Error> for BuildError {
    fn from(e: std::io::Error) -> Self {
        BuildError::Io(e)
    }
}

/// Build pipeline for executing builds.
pub struct BuildPipeline {
    /// Build context
    context: BuildContext,
    /// Whether to stop on first error
    fail_fast: bool,
    /// Whether to do a dry run (don't actually write)
    dry_run: bool,
}

impl BuildPipeline {
    /// Create a new build pipeline.
    ///
    /// Fail-fast mode starts out as configured in `recolor.fail_fast`.
    pub fn new(context: BuildContext) -> Self {
        let fail_fast = context.is_fail_fast();
        Self { context, fail_fast, dry_run: false }
    }

    /// Set fail-fast mode (stop on first error).
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Set dry-run mode (don't actually write).
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Get the build context.
    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    /// Run the build pipeline.
    ///
    /// A missing palette, source directory or output root aborts the build.
    /// Per-file failures are recorded in the result instead.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let palette = load_palette(self.context.config(), self.context.project_root())?;
        if palette.is_empty() {
            tracing::warn!("palette has no colors, nothing will be written");
        }
        let sources = discover_sources(&self.context)?;
        let out_dir = self.context.out_dir();

        tracing::info!(
            sources = sources.len(),
            nodes = palette.colors.len(),
            out = %out_dir.display(),
            dry_run = self.dry_run,
            "starting build"
        );
        if self.context.is_verbose() {
            println!("Build plan: {} sources", sources.len());
            for source in &sources {
                println!("  - {}", source.display());
            }
        }

        if !self.dry_run {
            fs::create_dir_all(&out_dir)?;
        }

        let transform = Transform::new(&self.context.config().recolor.target, palette, out_dir)
            .with_jobs(self.context.jobs())
            .with_recursive_dirs(self.context.config().recolor.recursive_dirs);

        let src_dir = self.context.src_dir();
        let mut result = BuildResult::new();
        for source in &sources {
            let file_result = self.execute_source(&transform, &src_dir, source);

            if file_result.status.is_failure() && self.fail_fast {
                result.add_result(file_result);
                return Ok(result.with_duration(start.elapsed()));
            }

            result.add_result(file_result);
        }

        Ok(result.with_duration(start.elapsed()))
    }

    /// Recolor a single source file.
    fn execute_source(&self, transform: &Transform, src_dir: &Path, path: &Path) -> FileResult {
        let start = Instant::now();
        let relative = path.strip_prefix(src_dir).unwrap_or(path).to_path_buf();

        if self.context.is_verbose() {
            println!("Building: {} ...", relative.display());
        }

        if self.dry_run {
            return match transform.plan(&relative) {
                Ok(planned) => FileResult::skipped(relative, planned),
                Err(e) => FileResult::failed(relative, e.to_string(), start.elapsed()),
            };
        }

        let file = match SourceFile::read(src_dir, path) {
            Ok(file) => file,
            Err(e) => return FileResult::failed(relative, e.to_string(), start.elapsed()),
        };

        let result = FileResult::from_report(transform.process(&file));
        if self.context.is_verbose() {
            match &result.status {
                status if status.is_failure() => println!("  Failed: {}", status),
                _ => println!("  Done in {:?}", result.duration),
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::BuildStatus;
    use crate::config::default_config;
    use crate::config::RecolorConfig;
    use crate::palette::ColorSpec;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const ICON: &str = r##"<svg><path fill="#FF0000"/></svg>"##;

    fn setup_project(temp: &TempDir) -> RecolorConfig {
        let src = temp.path().join("svg");
        fs::create_dir_all(src.join("ui")).unwrap();
        fs::write(src.join("logo.svg"), ICON).unwrap();
        fs::write(src.join("ui/arrow.svg"), ICON).unwrap();

        let mut config = default_config();
        config.recolor.target = "#FF0000".to_string();
        config.recolor.colors =
            vec![ColorSpec::leaf("blue", "#0000FF"), ColorSpec::leaf("green", "#00FF00")];
        config.recolor.recursive_dirs = true;
        config
    }

    #[test]
    fn test_build_writes_every_color() {
        let temp = TempDir::new().unwrap();
        let config = setup_project(&temp);
        let ctx = BuildContext::new(config, temp.path().to_path_buf());

        let result = BuildPipeline::new(ctx).build().unwrap();

        assert!(result.is_success());
        assert_eq!(result.success_count(), 2);
        assert_eq!(result.all_outputs().len(), 4);
        let out = temp.path().join("dist");
        let blue = fs::read_to_string(out.join("ui/arrow-blue.svg")).unwrap();
        assert_eq!(blue, r##"<svg><path fill="#0000FF"/></svg>"##);
        assert!(out.join("logo-green.svg").is_file());
    }

    #[test]
    fn test_build_dry_run_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let config = setup_project(&temp);
        let ctx = BuildContext::new(config, temp.path().to_path_buf());

        let result = BuildPipeline::new(ctx).with_dry_run(true).build().unwrap();

        assert_eq!(result.skipped_count(), 2);
        assert_eq!(result.all_outputs().len(), 4);
        assert!(!temp.path().join("dist").exists());
    }

    #[test]
    fn test_build_records_failed_files() {
        let temp = TempDir::new().unwrap();
        let mut config = setup_project(&temp);
        config.recolor.recursive_dirs = false;
        let deep = temp.path().join("svg/deep/er");
        fs::create_dir_all(&deep).unwrap();
        fs::write(deep.join("icon.svg"), ICON).unwrap();
        let ctx = BuildContext::new(config, temp.path().to_path_buf());

        let result = BuildPipeline::new(ctx).build().unwrap();

        // dist/ui has an existing parent; dist/deep/er does not.
        assert_eq!(result.files.len(), 3);
        assert_eq!(result.failed_count(), 1);
        assert_eq!(result.failures()[0].source, PathBuf::from("deep/er/icon.svg"));
        assert!(temp.path().join("dist/ui/arrow-blue.svg").is_file());
    }

    #[test]
    fn test_build_fail_fast_stops_early() {
        let temp = TempDir::new().unwrap();
        let mut config = setup_project(&temp);
        config.recolor.colors.push(ColorSpec::invalid("broken", serde_json::json!(7)));
        let ctx = BuildContext::new(config, temp.path().to_path_buf());

        let result = BuildPipeline::new(ctx).with_fail_fast(true).build().unwrap();

        assert_eq!(result.files.len(), 1);
        assert_eq!(result.failed_count(), 1);
        assert!(matches!(result.files[0].status, BuildStatus::Failed(_)));
    }

    #[test]
    fn test_build_continues_without_fail_fast() {
        let temp = TempDir::new().unwrap();
        let mut config = setup_project(&temp);
        config.recolor.colors.push(ColorSpec::invalid("broken", serde_json::json!(7)));
        let ctx = BuildContext::new(config, temp.path().to_path_buf());

        let result = BuildPipeline::new(ctx).build().unwrap();

        assert_eq!(result.files.len(), 2);
        assert_eq!(result.failed_count(), 2);
        assert!(result.all_outputs().is_empty());
        assert!(result.failures()[0].errors[0].contains("'broken'"));
    }

    #[test]
    fn test_build_empty_palette_file() {
        let temp = TempDir::new().unwrap();
        let mut config = setup_project(&temp);
        fs::write(temp.path().join("empty.json"), "[]").unwrap();
        config.recolor.palette = Some(PathBuf::from("empty.json"));
        config.recolor.colors.clear();
        let ctx = BuildContext::new(config, temp.path().to_path_buf());

        let result = BuildPipeline::new(ctx).build().unwrap();

        assert!(result.is_success());
        assert_eq!(result.success_count(), 2);
        assert!(result.all_outputs().is_empty());
    }

    #[test]
    fn test_build_empty_value_is_written() {
        let temp = TempDir::new().unwrap();
        let mut config = setup_project(&temp);
        config.recolor.colors = vec![ColorSpec::leaf("none", "")];
        let ctx = BuildContext::new(config, temp.path().to_path_buf());

        let result = BuildPipeline::new(ctx).build().unwrap();

        assert!(result.is_success());
        let logo = fs::read_to_string(temp.path().join("dist/logo-none.svg")).unwrap();
        assert_eq!(logo, r##"<svg><path fill=""/></svg>"##);
    }

    #[test]
    fn test_build_missing_palette_file() {
        let temp = TempDir::new().unwrap();
        let mut config = setup_project(&temp);
        config.recolor.palette = Some(PathBuf::from("missing.json"));
        let ctx = BuildContext::new(config, temp.path().to_path_buf());

        let err = BuildPipeline::new(ctx).build().unwrap_err();
        assert!(matches!(err, BuildError::Config(_)));
    }

    #[test]
    fn test_build_missing_source_dir() {
        let temp = TempDir::new().unwrap();
        let mut config = setup_project(&temp);
        config.project.src = PathBuf::from("nowhere");
        let ctx = BuildContext::new(config, temp.path().to_path_buf());

        let err = BuildPipeline::new(ctx).build().unwrap_err();
        assert!(matches!(err, BuildError::Discovery(_)));
        assert!(err.to_string().starts_with("Discovery error"));
    }
}
