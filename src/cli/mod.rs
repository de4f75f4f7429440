//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod build;
mod palette;
mod run;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Recolor - Fan color-templated SVGs out into one file per palette color
#[derive(Parser)]
#[command(name = "recolor")]
#[command(about = "Recolor - Fan color-templated SVGs out into one file per palette color")]
#[command(version)]
pub struct Cli {
    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the project described by recolor.toml
    Build {
        /// Path to recolor.toml (default: search upward from the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override output directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Override source directory
        #[arg(long)]
        src: Option<PathBuf>,

        /// Override the literal color token to replace
        #[arg(short, long)]
        target: Option<String>,

        /// Override the palette file (.json, .json5 or .toml)
        #[arg(short, long)]
        palette: Option<PathBuf>,

        /// Create missing parent directories of each output directory
        #[arg(long)]
        parents: bool,

        /// Worker threads per file (default: available parallelism)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Stop at the first source that fails
        #[arg(long)]
        fail_fast: bool,

        /// Dry run (show what would be written without writing)
        #[arg(long)]
        dry_run: bool,

        /// Watch for changes and rebuild automatically
        #[arg(short, long)]
        watch: bool,
    },

    /// Recolor explicit files without a project config
    Run {
        /// Source files; directories pass through without output
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Literal color token to replace (e.g. "#FF0000")
        #[arg(short, long)]
        target: String,

        /// Palette file (.json, .json5 or .toml)
        #[arg(short, long)]
        palette: PathBuf,

        /// Output directory
        #[arg(short, long)]
        out: PathBuf,

        /// Base directory; outputs keep each input's path relative to it
        #[arg(long)]
        base: Option<PathBuf>,

        /// Worker threads per file
        #[arg(short, long, default_value = "1")]
        jobs: usize,

        /// Create missing parent directories of each output directory
        #[arg(long)]
        parents: bool,
    },

    /// Print the flattened colors of a palette file
    Palette {
        /// Palette file (.json, .json5 or .toml)
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Install the stderr log subscriber.
fn init_tracing(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            config,
            out,
            src,
            target,
            palette,
            parents,
            jobs,
            fail_fast,
            dry_run,
            watch,
        } => build::run_build(build::BuildArgs {
            config,
            out,
            src,
            target,
            palette,
            parents,
            jobs,
            fail_fast,
            dry_run,
            watch,
            verbose: cli.verbose,
        }),
        Commands::Run { inputs, target, palette, out, base, jobs, parents } => {
            run::run_files(&inputs, &target, &palette, &out, base.as_deref(), jobs, parents)
        }
        Commands::Palette { file, json } => palette::run_palette(&file, json),
    }
}
