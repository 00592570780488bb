//! Dynamically-typed configuration values
//!
//! Numbers are kept as [`serde_json::Number`], which with the
//! `arbitrary_precision` feature stores the decimal text exactly as written.
//! `10.50` stays `10.50` through JSON export.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Number;

/// Ordered string-keyed mapping of values.
pub type Mapping = IndexMap<String, Value>;

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Path(PathBuf),
    List(Vec<Value>),
    Map(Mapping),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    /// The value as an integer, if it is a number without a fractional part.
    pub fn as_i64(&self) -> Option<i64> {
        let number = self.as_number()?;
        if let Some(i) = number.as_i64() {
            return Some(i);
        }
        let float = number.as_f64()?;
        (float.fract() == 0.0 && float.abs() < i64::MAX as f64).then_some(float as i64)
    }

    pub fn as_path(&self) -> Option<&PathBuf> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Short type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Path(_) => "path",
            Self::List(_) => "list",
            Self::Map(_) => "dict",
        }
    }

    /// Parse a decimal literal into a number value.
    pub fn number_from_str(text: &str) -> Option<Value> {
        Number::from_str(text.trim()).ok().map(Value::Number)
    }

    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert a YAML document node.
    ///
    /// Tagged nodes, non-scalar keys and non-finite floats have no
    /// configuration meaning and are rejected.
    pub fn from_yaml(value: serde_yaml::Value) -> Result<Self, String> {
        Ok(match value {
            serde_yaml::Value::Null => Self::Null,
            serde_yaml::Value::Bool(b) => Self::Bool(b),
            serde_yaml::Value::Number(n) => {
                let text = n.to_string();
                Self::number_from_str(&text)
                    .ok_or_else(|| format!("unsupported numeric value '{text}'"))?
            }
            serde_yaml::Value::String(s) => Self::String(s),
            serde_yaml::Value::Sequence(items) => Self::List(
                items
                    .into_iter()
                    .map(Self::from_yaml)
                    .collect::<Result<_, _>>()?,
            ),
            serde_yaml::Value::Mapping(map) => {
                let mut out = Mapping::with_capacity(map.len());
                for (key, value) in map {
                    let key = match key {
                        serde_yaml::Value::String(s) => s,
                        serde_yaml::Value::Number(n) => n.to_string(),
                        serde_yaml::Value::Bool(b) => b.to_string(),
                        other => return Err(format!("unsupported mapping key {other:?}")),
                    };
                    out.insert(key, Self::from_yaml(value)?);
                }
                Self::Map(out)
            }
            serde_yaml::Value::Tagged(tagged) => {
                return Err(format!("unsupported tagged value '{}'", tagged.tag));
            }
        })
    }

    /// Exact JSON form. Numbers keep their written precision and paths
    /// become strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Value::Number(n.clone()),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Path(p) => serde_json::Value::String(p.to_string_lossy().into_owned()),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }

    /// Rendering as a legacy script sees it: lists become Tcl lists,
    /// booleans `1`/`0`, null the empty string.
    pub fn to_tcl_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(true) => "1".to_string(),
            Self::Bool(false) => "0".to_string(),
            Self::Number(n) => n.to_string(),
            Self::String(s) => s.clone(),
            Self::Path(p) => p.to_string_lossy().into_owned(),
            Self::List(items) => items
                .iter()
                .map(|item| quote_tcl(&item.to_tcl_string()))
                .collect::<Vec<_>>()
                .join(" "),
            Self::Map(map) => map
                .iter()
                .flat_map(|(k, v)| [quote_tcl(k), quote_tcl(&v.to_tcl_string())])
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

fn quote_tcl(element: &str) -> String {
    let plain = !element.is_empty()
        && !element
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '{' | '}' | '"' | '$' | '[' | ']' | '\\' | ';'));
    if plain {
        element.to_string()
    } else {
        format!("{{{element}}}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::List(_) | Self::Map(_) => write!(f, "{}", self.to_json()),
        }
    }
}

/// Numbers serialize as native integers or floats so that every serde
/// format can represent them. Use [`Value::to_json`] for exact decimals.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => {
                if let Some(i) = n.as_i64() {
                    serializer.serialize_i64(i)
                } else if let Some(u) = n.as_u64() {
                    serializer.serialize_u64(u)
                } else if let Some(f) = n.as_f64() {
                    serializer.serialize_f64(f)
                } else {
                    serializer.serialize_str(&n.to_string())
                }
            }
            Self::String(s) => serializer.serialize_str(s),
            Self::Path(p) => serializer.serialize_str(&p.to_string_lossy()),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Number(Number::from(i))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Number(Number::from(i))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Self::Number(Number::from(u))
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Self::Number(n)
    }
}

impl From<PathBuf> for Value {
    fn from(p: PathBuf) -> Self {
        Self::Path(p)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Self::Map(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Self::from_json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_numbers_keep_written_precision() {
        let value: serde_json::Value = serde_json::from_str(r#"{"A": 10.50}"#).unwrap();
        let value = Value::from_json(value);
        assert_eq!(value.to_json().to_string(), r#"{"A":10.50}"#);
    }

    #[test]
    fn yaml_nodes_convert() {
        let doc: serde_yaml::Value = serde_yaml::from_str("A: 1\nB: [x, true]\nC: ~\n").unwrap();
        let value = Value::from_yaml(doc).unwrap();
        assert_eq!(value.to_json(), json!({"A": 1, "B": ["x", true], "C": null}));
    }

    #[test]
    fn yaml_tags_are_rejected() {
        let doc: serde_yaml::Value = serde_yaml::from_str("A: !custom 1\n").unwrap();
        assert!(Value::from_yaml(doc).is_err());
    }

    #[test]
    fn tcl_rendering() {
        let value = Value::List(vec!["a".into(), "b c".into(), Value::Bool(true)]);
        assert_eq!(value.to_tcl_string(), "a {b c} 1");
        assert_eq!(Value::Null.to_tcl_string(), "");
    }

    #[test]
    fn integral_floats_are_integers() {
        assert_eq!(Value::number_from_str("3.0").unwrap().as_i64(), Some(3));
        assert_eq!(Value::number_from_str("3.5").unwrap().as_i64(), None);
    }

    #[test]
    fn paths_serialize_as_strings() {
        let value = Value::Path(PathBuf::from("/tmp/x"));
        assert_eq!(serde_json::to_string(&value).unwrap(), r#""/tmp/x""#);
    }
}
