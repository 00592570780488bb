//! Run metadata stored under the `meta` key

use std::path::Path;

use serde::{Deserialize, Serialize};

use flow_fs::{NormalizedPath, io};

use crate::keys::META_KEY;
use crate::source::{SourceFormat, parse_modern};
use crate::value::{Mapping, Value};
use crate::{Error, Result};

/// Flow used when a configuration does not name one.
pub const DEFAULT_FLOW: &str = "Classic";

fn default_version() -> i64 {
    1
}

fn default_flow() -> Option<FlowSelection> {
    Some(FlowSelection::Name(DEFAULT_FLOW.to_string()))
}

/// A flow name or a sequence of step identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlowSelection {
    Name(String),
    Steps(Vec<String>),
}

impl FlowSelection {
    fn to_value(&self) -> Value {
        match self {
            Self::Name(name) => Value::String(name.clone()),
            Self::Steps(steps) => Value::List(steps.iter().map(|s| Value::from(s.as_str())).collect()),
        }
    }
}

/// Parsed `meta` object.
///
/// An explicit `"flow": null` is kept as `None`; a missing `flow` selects
/// [`DEFAULT_FLOW`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Meta {
    #[serde(default = "default_version")]
    pub version: i64,
    #[serde(default = "default_flow")]
    pub flow: Option<FlowSelection>,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            version: default_version(),
            flow: default_flow(),
        }
    }
}

impl Meta {
    /// Parse a raw `meta` value. The error is the parser's message.
    pub fn from_value(value: &Value) -> std::result::Result<Self, String> {
        serde_json::from_value(value.to_json()).map_err(|e| e.to_string())
    }

    /// Read only the metadata of a configuration file.
    ///
    /// Returns `None` for legacy Tcl files, which carry no metadata. A
    /// `flow_override` replaces the file's flow selection.
    pub fn from_file(path: impl AsRef<Path>, flow_override: Option<FlowSelection>) -> Result<Option<Meta>> {
        let path = NormalizedPath::absolute(path.as_ref())?;
        let format = SourceFormat::from_path(&path)?;
        if format == SourceFormat::Tcl {
            return Ok(None);
        }

        let text = io::read_text(&path)?;
        let source = parse_modern(&text, format, &path)?;
        let mut meta = match source.meta {
            Some(raw) => Meta::from_value(&raw).map_err(|message| Error::Parse {
                path: path.to_native(),
                format: format.name(),
                message: format!("'{META_KEY}' object is invalid: {message}"),
            })?,
            None => Meta::default(),
        };
        if flow_override.is_some() {
            meta.flow = flow_override;
        }
        Ok(Some(meta))
    }

    pub fn to_value(&self) -> Value {
        let mut map = Mapping::new();
        map.insert("version".to_string(), Value::from(self.version));
        map.insert(
            "flow".to_string(),
            self.flow.as_ref().map_or(Value::Null, FlowSelection::to_value),
        );
        Value::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(json: serde_json::Value) -> std::result::Result<Meta, String> {
        Meta::from_value(&Value::from_json(json))
    }

    #[test]
    fn defaults_apply_to_missing_fields() {
        assert_eq!(parse(json!({})).unwrap(), Meta::default());
        assert_eq!(parse(json!({"version": 2})).unwrap().version, 2);
    }

    #[test]
    fn explicit_null_flow_is_none() {
        assert_eq!(parse(json!({"flow": null})).unwrap().flow, None);
    }

    #[test]
    fn flow_may_be_a_step_list() {
        let meta = parse(json!({"flow": ["Yosys.Synthesis", "OpenROAD.Floorplan"]})).unwrap();
        assert_eq!(
            meta.flow,
            Some(FlowSelection::Steps(vec![
                "Yosys.Synthesis".to_string(),
                "OpenROAD.Floorplan".to_string()
            ]))
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = parse(json!({"flow": "Classic", "color": "blue"})).unwrap_err();
        assert!(err.contains("color"), "{err}");
    }

    #[test]
    fn value_form() {
        assert_eq!(
            Meta::default().to_value().to_json(),
            json!({"version": 1, "flow": "Classic"})
        );
    }
}
