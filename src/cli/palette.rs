//! Palette command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::palette::{Palette, PaletteLoadError};

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Print the flattened colors of a palette file, one `name value` per line
pub fn run_palette(file: &Path, json: bool) -> ExitCode {
    let palette = match Palette::from_file(file) {
        Ok(p) => p,
        Err(e @ PaletteLoadError::UnsupportedFormat(_)) => {
            eprintln!("Error: {}", e);
            eprintln!("Supported palette formats: .json, .json5, .toml");
            return ExitCode::from(EXIT_ERROR);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let colors = match palette.resolve() {
        Ok(colors) => colors,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if json {
        match serde_json::to_string_pretty(&colors) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        let width = colors.iter().map(|c| c.name.len()).max().unwrap_or(0);
        for color in &colors {
            println!("{:width$}  {}", color.name, color.value, width = width);
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}
