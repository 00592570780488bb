//! Variable types and value coercion

use std::fmt;
use std::path::PathBuf;

use flow_config::{Mapping, Value};

/// The type a variable's value is coerced to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarType {
    Str,
    Int,
    Decimal,
    Bool,
    Path,
    List(Box<VarType>),
    /// String keys, values of the inner type
    Dict(Box<VarType>),
    /// One of a fixed set of strings
    Enum(Vec<String>),
    /// Null is allowed and is the implicit default
    Optional(Box<VarType>),
    Any,
}

impl VarType {
    pub fn list(inner: VarType) -> Self {
        Self::List(Box::new(inner))
    }

    pub fn dict(inner: VarType) -> Self {
        Self::Dict(Box::new(inner))
    }

    pub fn optional(inner: VarType) -> Self {
        Self::Optional(Box::new(inner))
    }

    pub fn one_of(options: &[&str]) -> Self {
        Self::Enum(options.iter().map(|o| o.to_string()).collect())
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_) | Self::Any)
    }

    /// Coerce a raw value. Values already in normalized form come back
    /// unchanged.
    pub fn coerce(&self, value: &Value) -> Result<Value, String> {
        match self {
            Self::Any => Ok(value.clone()),
            Self::Optional(inner) => match value {
                Value::Null => Ok(Value::Null),
                other => inner.coerce(other),
            },
            _ if value.is_null() => Err("null is not allowed".to_string()),
            Self::Str => coerce_str(value),
            Self::Int => coerce_int(value),
            Self::Decimal => coerce_decimal(value),
            Self::Bool => coerce_bool(value),
            Self::Path => coerce_path(value),
            Self::Enum(options) => coerce_enum(value, options),
            Self::List(inner) => coerce_list(value, inner),
            Self::Dict(inner) => coerce_dict(value, inner),
        }
    }
}

fn coerce_str(value: &Value) -> Result<Value, String> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Path(p) => Ok(Value::String(p.to_string_lossy().into_owned())),
        other => Err(format!("expected a string, got {}", other.type_name())),
    }
}

fn coerce_int(value: &Value) -> Result<Value, String> {
    let parsed = match value {
        Value::Number(_) => value.as_i64(),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| Value::number_from_str(s).and_then(|n| n.as_i64())),
        _ => None,
    };
    parsed
        .map(Value::from)
        .ok_or_else(|| format!("'{value}' is not a valid integer"))
}

fn coerce_decimal(value: &Value) -> Result<Value, String> {
    let number = match value {
        Value::Number(_) => Some(value.clone()),
        Value::String(s) => Value::number_from_str(s),
        _ => None,
    };
    number
        .filter(|n| n.as_number().and_then(|n| n.as_f64()).is_some_and(f64::is_finite))
        .ok_or_else(|| format!("'{value}' is not a valid number"))
}

fn coerce_bool(value: &Value) -> Result<Value, String> {
    let parsed = match value {
        Value::Bool(b) => Some(*b),
        Value::Number(_) => match value.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    };
    parsed
        .map(Value::Bool)
        .ok_or_else(|| format!("'{value}' is not a valid boolean"))
}

fn coerce_path(value: &Value) -> Result<Value, String> {
    match value {
        Value::Path(_) => Ok(value.clone()),
        Value::String(s) => Ok(Value::Path(PathBuf::from(s))),
        other => Err(format!("expected a path, got {}", other.type_name())),
    }
}

fn coerce_enum(value: &Value, options: &[String]) -> Result<Value, String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => return Err(format!("expected one of {}, got {}", options.join(", "), other.type_name())),
    };
    if options.iter().any(|o| *o == text) {
        Ok(Value::String(text))
    } else {
        Err(format!("'{text}' is not one of: {}", options.join(", ")))
    }
}

/// Split a scalar string into list elements: on commas when present,
/// otherwise as a Tcl list.
fn split_string(s: &str) -> Result<Vec<Value>, String> {
    let parts: Vec<String> = if s.contains(',') {
        s.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        flow_tcl::split_list(s).map_err(|e| e.to_string())?
    };
    Ok(parts.into_iter().map(Value::String).collect())
}

fn coerce_list(value: &Value, inner: &VarType) -> Result<Value, String> {
    let items = match value {
        Value::List(items) => items.clone(),
        Value::String(s) => split_string(s)?,
        Value::Map(_) => return Err("expected a list, got dict".to_string()),
        scalar => vec![scalar.clone()],
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| inner.coerce(item).map_err(|e| format!("element {i}: {e}")))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::List)
}

fn coerce_dict(value: &Value, inner: &VarType) -> Result<Value, String> {
    let entries: Vec<(String, Value)> = match value {
        Value::Map(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        Value::String(s) => {
            let elements = flow_tcl::split_list(s).map_err(|e| e.to_string())?;
            if elements.len() % 2 != 0 {
                return Err("a dict given as a string needs an even number of elements".to_string());
            }
            elements
                .chunks_exact(2)
                .map(|pair| (pair[0].clone(), Value::String(pair[1].clone())))
                .collect()
        }
        other => return Err(format!("expected a dict, got {}", other.type_name())),
    };

    let mut out = Mapping::with_capacity(entries.len());
    for (key, value) in entries {
        let coerced = inner.coerce(&value).map_err(|e| format!("key '{key}': {e}"))?;
        out.insert(key, coerced);
    }
    Ok(Value::Map(out))
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str => f.write_str("str"),
            Self::Int => f.write_str("int"),
            Self::Decimal => f.write_str("Decimal"),
            Self::Bool => f.write_str("bool"),
            Self::Path => f.write_str("Path"),
            Self::List(inner) => write!(f, "List[{inner}]"),
            Self::Dict(inner) => write!(f, "Dict[str, {inner}]"),
            Self::Enum(options) => write!(f, "'{}'", options.join("'|'")),
            Self::Optional(inner) => write!(f, "Optional[{inner}]"),
            Self::Any => f.write_str("Any"),
        }
    }
}
