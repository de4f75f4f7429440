//! Build command implementation

use std::path::PathBuf;
use std::process::ExitCode;

use crate::build::{BuildContext, BuildPipeline};
use crate::config::loader::{
    ensure_valid, find_config, load_config, merge_cli_overrides, project_root, CliOverrides,
};
use crate::config::ConfigError;
use crate::watch::{watch_and_rebuild, WatchOptions};

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Flags of the build command
#[derive(Debug, Default)]
pub struct BuildArgs {
    pub config: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub src: Option<PathBuf>,
    pub target: Option<String>,
    pub palette: Option<PathBuf>,
    pub parents: bool,
    pub jobs: Option<usize>,
    pub fail_fast: bool,
    pub dry_run: bool,
    pub watch: bool,
    pub verbose: bool,
}

/// Run the build command
pub fn run_build(args: BuildArgs) -> ExitCode {
    let config_path = args.config.clone().or_else(find_config);
    let has_config = config_path.is_some();

    // Find config file path and determine project root
    let (config, root) = match config_path {
        Some(config_path) => {
            if args.verbose {
                println!("Using config: {}", config_path.display());
            }
            let cfg = match load_config(Some(&config_path)) {
                Ok(cfg) => cfg,
                Err(e @ ConfigError::Validation(_)) => {
                    eprintln!("Error loading config: {}", e);
                    return ExitCode::from(EXIT_INVALID_ARGS);
                }
                Err(e) => {
                    eprintln!("Error loading config: {}", e);
                    return ExitCode::from(EXIT_ERROR);
                }
            };
            let root = match project_root(&config_path) {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => std::env::current_dir().unwrap_or_default(),
            };
            (cfg, root)
        }
        None => {
            if args.verbose {
                println!("No recolor.toml found, using defaults and command-line flags");
            }
            let root = std::env::current_dir().unwrap_or_default();
            (crate::config::loader::default_config(), root)
        }
    };

    // Apply CLI overrides to config
    let mut config = config;
    let overrides = CliOverrides {
        out: args.out,
        src: args.src,
        target: args.target,
        palette: args.palette,
        jobs: args.jobs,
        fail_fast: args.fail_fast.then_some(true),
        recursive_dirs: args.parents.then_some(true),
    };
    merge_cli_overrides(&mut config, &overrides);

    if let Err(e) = ensure_valid(&config) {
        eprintln!("Error: {}", e);
        if !has_config {
            eprintln!("Create a recolor.toml or pass --target and --palette");
        }
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let context = BuildContext::new(config, root).with_verbose(args.verbose);

    // Check source directory exists
    let src_dir = context.src_dir();
    if !src_dir.exists() {
        eprintln!("Error: Source directory not found: {}", src_dir.display());
        eprintln!("Create the directory or specify a different path with --src");
        return ExitCode::from(EXIT_ERROR);
    }

    if args.dry_run {
        println!("Dry run - would build:");
        println!("  Source: {}", src_dir.display());
        println!("  Output: {}", context.out_dir().display());

        let pipeline = BuildPipeline::new(context).with_dry_run(true);
        return match pipeline.build() {
            Ok(result) => {
                println!("  Files: {}", result.files.len());
                for file in &result.files {
                    println!("    - {}", file.source.display());
                    for output in &file.outputs {
                        println!("        -> {}", output.display());
                    }
                }
                if result.is_success() {
                    ExitCode::from(EXIT_SUCCESS)
                } else {
                    eprintln!("{}", result.summary());
                    ExitCode::from(EXIT_ERROR)
                }
            }
            Err(e) => {
                eprintln!("  Error planning build: {}", e);
                ExitCode::from(EXIT_ERROR)
            }
        };
    }

    if args.watch {
        println!("Starting watch mode...");
        println!("Press Ctrl+C to stop");
        println!();

        return match watch_and_rebuild(WatchOptions::new(context)) {
            Ok(()) => ExitCode::from(EXIT_SUCCESS),
            Err(e) => {
                eprintln!("Watch error: {}", e);
                ExitCode::from(EXIT_ERROR)
            }
        };
    }

    println!("Building...");
    match BuildPipeline::new(context).build() {
        Ok(result) => {
            if result.is_success() {
                println!("{}", result.summary());
                ExitCode::from(EXIT_SUCCESS)
            } else {
                eprintln!("{}", result.summary());
                ExitCode::from(EXIT_ERROR)
            }
        }
        Err(e) => {
            eprintln!("Build error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
