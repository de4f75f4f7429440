//! Configuration loading and discovery for `recolor.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{ProjectConfig, RecolorConfig, RecolorSection, WatchConfig};
use crate::palette::{Palette, PaletteLoadError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for when discovering a project configuration.
pub const CONFIG_FILE_NAME: &str = "recolor.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse recolor.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
    /// The configured palette could not be loaded
    #[error(transparent)]
    Palette(#[from] PaletteLoadError),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override output directory
    pub out: Option<PathBuf>,
    /// Override source directory
    pub src: Option<PathBuf>,
    /// Override target color
    pub target: Option<String>,
    /// Override palette file
    pub palette: Option<PathBuf>,
    /// Number of parallel jobs
    pub jobs: Option<usize>,
    /// Stop at the first failed file
    pub fail_fast: Option<bool>,
    /// Create missing output ancestors
    pub recursive_dirs: Option<bool>,
}

/// Find recolor.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for recolor.toml
/// 2. Check XDG_CONFIG_HOME/recolor/recolor.toml (or ~/.config/recolor/recolor.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find recolor.toml in XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("recolor").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find recolor.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a recolor.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns a default
/// configuration (which has no target or palette yet).
///
/// # Example
/// ```ignore
/// let config = load_config(Some(Path::new("icons/recolor.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<RecolorConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(default_config()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<RecolorConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: RecolorConfig = toml::from_str(&contents)?;
    ensure_valid(&config)?;
    Ok(config)
}

/// Turn validation findings into a [`ConfigError::Validation`].
pub fn ensure_valid(config: &RecolorConfig) -> Result<(), ConfigError> {
    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()))
    }
}

/// Create a default configuration when no recolor.toml is found.
///
/// The project name is the current directory name. Target and palette are
/// left unset, so the result only validates once CLI overrides fill them in.
pub fn default_config() -> RecolorConfig {
    let project_name = env::current_dir()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "unnamed".to_string());

    RecolorConfig {
        project: ProjectConfig {
            name: project_name,
            src: PathBuf::from("svg"),
            out: PathBuf::from("dist"),
        },
        recolor: RecolorSection::default(),
        watch: WatchConfig::default(),
    }
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut RecolorConfig, overrides: &CliOverrides) {
    if let Some(ref out) = overrides.out {
        config.project.out = out.clone();
    }

    if let Some(ref src) = overrides.src {
        config.project.src = src.clone();
    }

    if let Some(ref target) = overrides.target {
        config.recolor.target = target.clone();
    }

    if let Some(ref palette) = overrides.palette {
        config.recolor.palette = Some(palette.clone());
    }

    if let Some(jobs) = overrides.jobs {
        config.recolor.jobs = Some(jobs);
    }

    if let Some(fail_fast) = overrides.fail_fast {
        config.recolor.fail_fast = fail_fast;
    }

    if let Some(recursive_dirs) = overrides.recursive_dirs {
        config.recolor.recursive_dirs = recursive_dirs;
    }
}

/// Load the palette a configuration describes.
///
/// The palette file (resolved against `project_root`) comes first, followed
/// by any inline `colors`.
pub fn load_palette(config: &RecolorConfig, project_root: &Path) -> Result<Palette, ConfigError> {
    let mut palette = match &config.recolor.palette {
        Some(path) => Palette::from_file(&resolve_path(project_root, path))?,
        None => Palette::default(),
    };
    palette.extend(Palette::new(config.recolor.colors.clone()));
    Ok(palette)
}

/// Get the project root directory from a config file path.
///
/// Returns the parent directory of the recolor.toml file.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::ColorSpec;
    use serial_test::serial;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    const VALID_CONFIG: &[u8] = br##"
[project]
name = "icons"

[recolor]
target = "#FF0000"
palette = "palette.json"
"##;

    fn write_file(path: &Path, content: &[u8]) {
        File::create(path)
            .expect("should create file")
            .write_all(content)
            .expect("should write file content");
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        write_file(&config_path, VALID_CONFIG);

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        write_file(&config_path, VALID_CONFIG);

        let subdir = temp.path().join("svg").join("ui");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, None);
    }

    #[test]
    #[serial]
    fn test_find_xdg_config() {
        let temp = TempDir::new().expect("should create temp dir");
        let dir = temp.path().join("recolor");
        fs::create_dir_all(&dir).expect("should create config dir");
        write_file(&dir.join(CONFIG_FILE_NAME), VALID_CONFIG);

        let previous = env::var_os("XDG_CONFIG_HOME");
        env::set_var("XDG_CONFIG_HOME", temp.path());
        let found = find_xdg_config();
        match previous {
            Some(value) => env::set_var("XDG_CONFIG_HOME", value),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }

        assert_eq!(found, Some(dir.join(CONFIG_FILE_NAME)));
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        write_file(&config_path, VALID_CONFIG);

        let config = load_config(Some(&config_path)).expect("should load valid config");
        assert_eq!(config.project.name, "icons");
        assert_eq!(config.recolor.target, "#FF0000");
        assert_eq!(config.recolor.palette, Some(PathBuf::from("palette.json")));
    }

    #[test]
    fn test_load_config_missing_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let result = load_config(Some(&temp.path().join("nonexistent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        write_file(&config_path, b"this is not valid toml {{{");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        write_file(&config_path, b"[project]\nname = \"\"\n\n[recolor]\ntarget = \"\"\n");

        match load_config(Some(&config_path)) {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.contains("project.name")));
                assert!(errors.iter().any(|e| e.contains("recolor.target")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_config_needs_overrides() {
        let mut config = default_config();
        assert_eq!(config.project.src, PathBuf::from("svg"));
        assert_eq!(config.project.out, PathBuf::from("dist"));
        assert!(ensure_valid(&config).is_err());

        let overrides = CliOverrides {
            target: Some("#000".to_string()),
            palette: Some(PathBuf::from("palette.toml")),
            ..Default::default()
        };
        merge_cli_overrides(&mut config, &overrides);
        assert!(ensure_valid(&config).is_ok());
    }

    #[test]
    fn test_merge_cli_overrides_multiple() {
        let mut config = default_config();
        let overrides = CliOverrides {
            out: Some(PathBuf::from("public")),
            src: Some(PathBuf::from("assets")),
            jobs: Some(2),
            fail_fast: Some(true),
            recursive_dirs: Some(true),
            ..Default::default()
        };

        merge_cli_overrides(&mut config, &overrides);
        assert_eq!(config.project.out, PathBuf::from("public"));
        assert_eq!(config.project.src, PathBuf::from("assets"));
        assert_eq!(config.recolor.jobs, Some(2));
        assert!(config.recolor.fail_fast);
        assert!(config.recolor.recursive_dirs);
    }

    #[test]
    fn test_load_palette_file_then_inline() {
        let temp = TempDir::new().expect("should create temp dir");
        write_file(
            &temp.path().join("palette.json"),
            br##"[{"name": "blue", "value": "#00F"}]"##,
        );

        let mut config = default_config();
        config.recolor.palette = Some(PathBuf::from("palette.json"));
        config.recolor.colors = vec![ColorSpec::leaf("red", "#F00")];

        let palette = load_palette(&config, temp.path()).expect("should load palette");
        let names: Vec<String> =
            palette.resolve().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["blue", "red"]);
    }

    #[test]
    fn test_load_palette_missing_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let mut config = default_config();
        config.recolor.palette = Some(PathBuf::from("missing.json"));

        let result = load_palette(&config, temp.path());
        assert!(matches!(result, Err(ConfigError::Palette(_))));
    }

    #[test]
    fn test_resolve_path_absolute() {
        let root = Path::new("/project");
        let absolute = Path::new("/other/path");
        assert_eq!(resolve_path(root, absolute), PathBuf::from("/other/path"));
    }

    #[test]
    fn test_resolve_path_relative() {
        let root = Path::new("/project");
        let relative = Path::new("svg");
        assert_eq!(resolve_path(root, relative), PathBuf::from("/project/svg"));
    }

    #[test]
    fn test_project_root() {
        let config_path = Path::new("/project/recolor.toml");
        assert_eq!(project_root(config_path), Some(Path::new("/project")));
    }
}
