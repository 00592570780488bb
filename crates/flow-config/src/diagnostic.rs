//! Warnings and errors produced while resolving a configuration

use std::fmt;

use serde::Serialize;

/// What produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A deprecated name, format or value was used
    Deprecated,
    /// A legacy variable was translated to its replacement
    Migrated,
    /// A key that the flow no longer reads
    Removed,
    /// A key no variable or table knows about
    UnknownKey,
    /// A similarly-named PDK exists next to a missing one
    SimilarName,
    /// A variable reported a problem while compiling its value
    Variable,
    /// A variable failed to compile
    Compile,
    /// A legacy variable holds a value that cannot be translated
    InvalidLegacyValue,
    /// The `meta` object failed to parse
    InvalidMeta,
    /// A required resource does not exist
    NotFound,
}

/// One message, optionally attached to the key it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            key: None,
            message: message.into(),
        }
    }

    pub fn for_key(kind: DiagnosticKind, key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            key: Some(key.into()),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Warnings and errors of one resolution pass, in the order they occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub warnings: Vec<Diagnostic>,
    pub errors: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, diagnostic: Diagnostic) {
        self.warnings.push(diagnostic);
    }

    pub fn error(&mut self, diagnostic: Diagnostic) {
        self.errors.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Log `warnings` under a single header line.
pub(crate) fn log_warnings(header: &str, warnings: &[Diagnostic], verbose: bool) {
    if warnings.is_empty() {
        return;
    }
    if verbose {
        tracing::info!("{header}");
        for warning in warnings {
            tracing::warn!("{warning}");
        }
    } else {
        tracing::debug!("{header}");
        for warning in warnings {
            tracing::debug!("{warning}");
        }
    }
}
