//! Palette trees and their flattening into resolved colors
//!
//! A palette is an ordered tree of named colors. Leaves carry a literal color
//! token; groups carry child nodes and prefix their name onto every
//! descendant:
//!
//! ```
//! use recolor::palette::{resolve, ColorSpec};
//!
//! let tree = vec![ColorSpec::group(
//!     "brand",
//!     vec![ColorSpec::leaf("primary", "#111"), ColorSpec::leaf("secondary", "#222")],
//! )];
//!
//! let colors = resolve(&tree).unwrap();
//! assert_eq!(colors[0].name, "brand-primary");
//! assert_eq!(colors[1].value, "#222");
//! ```
//!
//! On disk a node is an object with a `name` (or the older `color` key) and a
//! `value` that is either a string or an array of nodes. A node with any other
//! value still loads, but resolving the palette fails on it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator placed between a parent name and a child name.
pub const NAME_SEPARATOR: &str = "-";

/// A palette node that cannot be turned into a color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PaletteError {
    /// Value is neither a string nor an array of nodes
    #[error("color '{name}' has neither a literal value nor a child sequence (found {found})")]
    InvalidValue { name: String, found: String },
}

/// Error loading a palette file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PaletteLoadError {
    /// File I/O error
    #[error("Failed to read palette {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// JSON syntax error
    #[error("Failed to parse palette JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// JSON5 syntax error
    #[error("Failed to parse palette JSON5: {0}")]
    Json5(#[from] json5::Error),
    /// TOML syntax error
    #[error("Failed to parse palette TOML: {0}")]
    Toml(#[from] toml::de::Error),
    /// Extension is not one of json, json5, toml
    #[error("Unsupported palette format: {} (expected .json, .json5 or .toml)", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// One node of a palette tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawColorSpec", into = "RawColorSpec")]
pub enum ColorSpec {
    /// A named literal color token
    Leaf { name: String, value: String },
    /// A named group whose children inherit the name as a prefix
    Group { name: String, children: Vec<ColorSpec> },
    /// A node whose value is neither a string nor a child sequence
    Invalid { name: String, value: serde_json::Value },
}

impl ColorSpec {
    pub fn leaf(name: impl Into<String>, value: impl Into<String>) -> Self {
        ColorSpec::Leaf { name: name.into(), value: value.into() }
    }

    pub fn group(name: impl Into<String>, children: Vec<ColorSpec>) -> Self {
        ColorSpec::Group { name: name.into(), children }
    }

    pub fn invalid(name: impl Into<String>, value: serde_json::Value) -> Self {
        ColorSpec::Invalid { name: name.into(), value }
    }

    /// The node's own (unqualified) name.
    pub fn name(&self) -> &str {
        match self {
            ColorSpec::Leaf { name, .. }
            | ColorSpec::Group { name, .. }
            | ColorSpec::Invalid { name, .. } => name,
        }
    }
}

/// A flattened palette entry ready for substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColor {
    /// Fully qualified name, ancestors joined with `-`
    pub name: String,
    /// Literal color token
    pub value: String,
}

/// Wire form of a palette node before its value shape is checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawColorSpec {
    #[serde(alias = "color")]
    pub name: String,
    #[serde(default)]
    pub value: RawColorValue,
}

/// Anything a node's `value` may hold on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawColorValue {
    Literal(String),
    Children(Vec<RawColorSpec>),
    Other(serde_json::Value),
}

/// A missing `value` key.
impl Default for RawColorValue {
    fn default() -> Self {
        RawColorValue::Other(serde_json::Value::Null)
    }
}

impl From<RawColorSpec> for ColorSpec {
    fn from(raw: RawColorSpec) -> Self {
        match raw.value {
            RawColorValue::Literal(value) => ColorSpec::Leaf { name: raw.name, value },
            RawColorValue::Children(children) => ColorSpec::Group {
                name: raw.name,
                children: children.into_iter().map(Into::into).collect(),
            },
            RawColorValue::Other(value) => ColorSpec::Invalid { name: raw.name, value },
        }
    }
}

impl From<ColorSpec> for RawColorSpec {
    fn from(spec: ColorSpec) -> Self {
        match spec {
            ColorSpec::Leaf { name, value } => {
                RawColorSpec { name, value: RawColorValue::Literal(value) }
            }
            ColorSpec::Group { name, children } => RawColorSpec {
                name,
                value: RawColorValue::Children(children.into_iter().map(Into::into).collect()),
            },
            ColorSpec::Invalid { name, value } => {
                RawColorSpec { name, value: RawColorValue::Other(value) }
            }
        }
    }
}

fn describe_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => format!("boolean {}", b),
        serde_json::Value::Number(n) => format!("number {}", n),
        serde_json::Value::String(s) => format!("string {:?}", s),
        serde_json::Value::Array(_) => "an array of non-color entries".to_string(),
        serde_json::Value::Object(_) => "an object".to_string(),
    }
}

/// Join a parent name and a child name.
///
/// Without a parent the child name is returned as-is.
pub fn naming_convention(parent: Option<&str>, child: &str) -> String {
    match parent {
        Some(parent) => [parent, child].join(NAME_SEPARATOR),
        None => child.to_string(),
    }
}

/// Flatten a palette tree into resolved colors.
///
/// Traversal is depth-first and left-to-right; the output keeps that order.
/// Groups contribute no entry of their own and an empty group contributes
/// nothing. Names and values are taken as-is, empty or not, and duplicate names
/// are passed through unchanged. The first [`ColorSpec::Invalid`] node met fails
/// the whole resolve.
pub fn resolve(tree: &[ColorSpec]) -> Result<Vec<ResolvedColor>, PaletteError> {
    let mut colors = Vec::new();
    for spec in tree {
        resolve_into(spec, None, &mut colors)?;
    }
    Ok(colors)
}

fn resolve_into(
    spec: &ColorSpec,
    parent: Option<&str>,
    out: &mut Vec<ResolvedColor>,
) -> Result<(), PaletteError> {
    let name = naming_convention(parent, spec.name());
    match spec {
        ColorSpec::Leaf { value, .. } => out.push(ResolvedColor { name, value: value.clone() }),
        ColorSpec::Group { children, .. } => {
            for child in children {
                resolve_into(child, Some(&name), out)?;
            }
        }
        ColorSpec::Invalid { value, .. } => {
            return Err(PaletteError::InvalidValue { name, found: describe_json(value) });
        }
    }
    Ok(())
}

/// A palette tree loaded from a file or built in code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub colors: Vec<ColorSpec>,
}

/// TOML palettes keep their nodes under a `colors` array.
#[derive(Deserialize)]
struct TomlPalette {
    #[serde(default)]
    colors: Vec<RawColorSpec>,
}

impl Palette {
    pub fn new(colors: Vec<ColorSpec>) -> Self {
        Self { colors }
    }

    /// Load a palette, choosing the format from the file extension.
    pub fn from_file(path: &Path) -> Result<Self, PaletteLoadError> {
        let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Palette, PaletteLoadError> = match ext.as_deref() {
            Some("json") => Self::from_json_str,
            Some("json5") => Self::from_json5_str,
            Some("toml") => Self::from_toml_str,
            _ => return Err(PaletteLoadError::UnsupportedFormat(path.to_path_buf())),
        };

        let content = fs::read_to_string(path)
            .map_err(|source| PaletteLoadError::Io { path: path.to_path_buf(), source })?;
        parse(&content)
    }

    /// Parse a JSON array of palette nodes.
    pub fn from_json_str(content: &str) -> Result<Self, PaletteLoadError> {
        let raw: Vec<RawColorSpec> = serde_json::from_str(content)?;
        Ok(Self::from_raw(raw))
    }

    /// Parse a JSON5 array of palette nodes.
    pub fn from_json5_str(content: &str) -> Result<Self, PaletteLoadError> {
        let raw: Vec<RawColorSpec> = json5::from_str(content)?;
        Ok(Self::from_raw(raw))
    }

    /// Parse a TOML document with a `colors` array of palette nodes.
    pub fn from_toml_str(content: &str) -> Result<Self, PaletteLoadError> {
        let parsed: TomlPalette = toml::from_str(content)?;
        Ok(Self::from_raw(parsed.colors))
    }

    fn from_raw(raw: Vec<RawColorSpec>) -> Self {
        Self { colors: raw.into_iter().map(ColorSpec::from).collect() }
    }

    /// Flatten this palette. See [`resolve`].
    pub fn resolve(&self) -> Result<Vec<ResolvedColor>, PaletteError> {
        resolve(&self.colors)
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Append the nodes of another palette after this one's.
    pub fn extend(&mut self, other: Palette) {
        self.colors.extend(other.colors);
    }
}

impl From<Vec<ColorSpec>> for Palette {
    fn from(colors: Vec<ColorSpec>) -> Self {
        Self::new(colors)
    }
}
