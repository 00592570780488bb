//! Reading raw configuration sources
//!
//! Modern sources (JSON, YAML) parse into a [`Mapping`] plus an optional
//! `meta` value. Legacy Tcl sources are evaluated by the loader instead.

use std::path::PathBuf;

use flow_fs::NormalizedPath;

use crate::keys::META_KEY;
use crate::value::{Mapping, Value};
use crate::{Error, Result};

/// Where a configuration comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigInput {
    /// An in-memory mapping; requires an explicit design directory
    Mapping(Mapping),
    /// A configuration file; its parent is the design directory
    File(PathBuf),
}

impl From<Mapping> for ConfigInput {
    fn from(mapping: Mapping) -> Self {
        Self::Mapping(mapping)
    }
}

impl From<PathBuf> for ConfigInput {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&std::path::Path> for ConfigInput {
    fn from(path: &std::path::Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

/// Configuration file format, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
    Tcl,
}

impl SourceFormat {
    pub fn from_path(path: &NormalizedPath) -> Result<Self> {
        if path.is_dir() {
            return Err(Error::DirectoryInput {
                path: path.to_native(),
            });
        }
        match path.extension() {
            Some("json") => Ok(Self::Json),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("tcl") => Ok(Self::Tcl),
            other => Err(Error::UnsupportedExtension {
                path: path.to_native(),
                extension: other.unwrap_or_default().to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Tcl => "Tcl",
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Tcl)
    }
}

/// A parsed modern configuration with its metadata split off.
#[derive(Debug, Clone, PartialEq)]
pub struct ModernSource {
    pub raw: Mapping,
    pub meta: Option<Value>,
}

/// Parse JSON or YAML text. The top level must be an object.
pub fn parse_modern(text: &str, format: SourceFormat, path: &NormalizedPath) -> Result<ModernSource> {
    let parse_error = |message: String| Error::Parse {
        path: path.to_native(),
        format: format.name(),
        message,
    };

    let value = match format {
        SourceFormat::Json => serde_json::from_str::<serde_json::Value>(text)
            .map(Value::from_json)
            .map_err(|e| parse_error(e.to_string()))?,
        SourceFormat::Yaml => {
            let doc = serde_yaml::from_str::<serde_yaml::Value>(text)
                .map_err(|e| parse_error(e.to_string()))?;
            Value::from_yaml(doc).map_err(parse_error)?
        }
        SourceFormat::Tcl => {
            return Err(Error::Fatal(format!(
                "{} is a legacy configuration and cannot be parsed as data",
                path
            )));
        }
    };

    match value {
        Value::Map(mut raw) => {
            let meta = split_meta(&mut raw);
            Ok(ModernSource { raw, meta })
        }
        other => Err(parse_error(format!(
            "expected an object at the top level, found {}",
            other.type_name()
        ))),
    }
}

/// Remove and return the `meta` entry.
pub fn split_meta(raw: &mut Mapping) -> Option<Value> {
    raw.shift_remove(META_KEY)
}

/// Split a `NAME=VALUE` override on its first `=`.
pub fn parse_override(text: &str) -> Result<(String, String)> {
    match text.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(Error::InvalidOverride(text.to_string())),
    }
}

/// Apply `NAME=VALUE` overrides as string values, replacing existing keys.
pub fn apply_overrides(raw: &mut Mapping, overrides: &[String]) -> Result<()> {
    for text in overrides {
        let (key, value) = parse_override(text)?;
        tracing::debug!(key = %key, "Applying command-line override");
        raw.insert(key, Value::String(value));
    }
    Ok(())
}
