//! The contract between the resolver and variable definitions
//!
//! The resolver never interprets values itself. Each variable reads its raw
//! value out of the working set, coerces it, applies its default, and
//! reports which raw keys it consumed.

use std::fmt;
use std::sync::Arc;

use crate::diagnostic::Diagnostic;
use crate::map::ConfigMap;
use crate::value::Value;

/// What a variable sees while compiling.
#[derive(Debug, Clone, Copy)]
pub struct CompileContext<'a> {
    /// Raw keys not yet consumed by an earlier variable
    pub working: &'a ConfigMap,
    /// Values already finalized by earlier variables, usable as defaults
    pub finalized: &'a ConfigMap,
}

/// A successfully compiled variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub value: Value,
    /// Raw keys to drop from the working set
    pub consumed: Vec<String>,
    pub warnings: Vec<Diagnostic>,
}

impl Compiled {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            consumed: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn consuming(mut self, key: impl Into<String>) -> Self {
        self.consumed.push(key.into());
        self
    }

    pub fn with_warning(mut self, warning: Diagnostic) -> Self {
        self.warnings.push(warning);
        self
    }
}

/// Why a variable could not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CompileError(pub String);

impl CompileError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A configuration variable definition.
///
/// Compilation must be idempotent: feeding a compiled value back in under
/// the variable's name yields the same value.
pub trait VariableSpec: Send + Sync {
    fn name(&self) -> &str;

    fn compile(&self, ctx: &CompileContext<'_>) -> Result<Compiled, CompileError>;
}

/// Shared handle to a variable definition.
pub type VariableRef = Arc<dyn VariableSpec>;

impl fmt::Debug for dyn VariableSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableSpec").field("name", &self.name()).finish()
    }
}
