//! Two-phase handling of a raw design layer
//!
//! Phase one pulls the few keys needed to locate the PDK out of an
//! unvalidated mapping. Phase two expands path and reference prefixes once
//! the design and PDK directories are known.

use std::path::{Path, PathBuf};

use crate::keys::SpecialKeys;
use crate::value::{Mapping, Value};
use crate::{Error, Result};

pub const DIR_PREFIX: &str = "dir::";
pub const PDK_DIR_PREFIX: &str = "pdk_dir::";
pub const REF_PREFIX: &str = "ref::$";

/// Keys that locate the PDK, read without validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pdk: Option<String>,
    pub scl: Option<String>,
    pub pdk_root: Option<PathBuf>,
}

fn scalar_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Path(p) => p.to_string_lossy().into_owned(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Phase one: read the PDK name, library and root from `raw` as given.
pub fn extract_process_info(raw: &Mapping) -> ProcessInfo {
    ProcessInfo {
        pdk: scalar_text(raw.get(SpecialKeys::PDK)),
        scl: scalar_text(raw.get(SpecialKeys::STD_CELL_LIBRARY)),
        pdk_root: scalar_text(raw.get(SpecialKeys::PDK_ROOT)).map(PathBuf::from),
    }
}

/// Directories prefixed values expand against.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub design_dir: &'a Path,
    pub pdk_path: &'a Path,
}

/// Phase two: expand `dir::`, `pdk_dir::` and `ref::$` prefixes.
///
/// Prefixes are recognized in strings at any nesting depth. A reference
/// copies the already-expanded value of an earlier top-level key.
pub fn resolve_design_layer(raw: &Mapping, ctx: &ResolveContext<'_>) -> Result<Mapping> {
    let mut resolved = Mapping::with_capacity(raw.len());
    for (key, value) in raw {
        let value = resolve_value(key, value, ctx, &resolved)?;
        resolved.insert(key.clone(), value);
    }
    Ok(resolved)
}

fn resolve_value(key: &str, value: &Value, ctx: &ResolveContext<'_>, earlier: &Mapping) -> Result<Value> {
    Ok(match value {
        Value::String(s) => {
            if let Some(rest) = s.strip_prefix(DIR_PREFIX) {
                Value::Path(ctx.design_dir.join(rest))
            } else if let Some(rest) = s.strip_prefix(PDK_DIR_PREFIX) {
                Value::Path(ctx.pdk_path.join(rest))
            } else if let Some(target) = s.strip_prefix(REF_PREFIX) {
                earlier
                    .get(target)
                    .cloned()
                    .ok_or_else(|| Error::InvalidReference {
                        key: key.to_string(),
                        target: target.to_string(),
                    })?
            } else {
                value.clone()
            }
        }
        Value::List(items) => Value::List(
            items
                .iter()
                .map(|item| resolve_value(key, item, ctx, earlier))
                .collect::<Result<_>>()?,
        ),
        Value::Map(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k.clone(), resolve_value(key, v, ctx, earlier)?);
            }
            Value::Map(out)
        }
        other => other.clone(),
    })
}
