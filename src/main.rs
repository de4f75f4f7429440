//! Recolor - Command-line tool for fanning color-templated SVGs out per palette color

use std::process::ExitCode;

use recolor::cli;

fn main() -> ExitCode {
    cli::run()
}
