//! Compiling a working set against a variable list

use crate::catalog::RemovedTable;
use crate::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::{ConfigLayer, InvalidConfig};
use crate::keys::{SpecialKeys, UnknownKeyPolicy};
use crate::map::ConfigMap;
use crate::migrate::{finalize_macros, migrate};
use crate::variable::{CompileContext, VariableRef};
use crate::Result;

/// The outcome of one validation pass.
///
/// `values` is only meaningful when `diagnostics` holds no errors.
#[derive(Debug, Clone)]
pub struct Processed {
    pub values: ConfigMap,
    pub diagnostics: Diagnostics,
}

impl Processed {
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.diagnostics.warnings
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.diagnostics.errors
    }

    /// The final values and warnings, or the aggregated error for `layer`.
    pub fn into_result(self, layer: ConfigLayer) -> Result<(ConfigMap, Vec<Diagnostic>)> {
        if self.diagnostics.has_errors() {
            let Diagnostics { warnings, errors } = self.diagnostics;
            return Err(InvalidConfig {
                layer,
                warnings,
                errors,
            }
            .into());
        }
        Ok((self.values, self.diagnostics.warnings))
    }
}

/// Migrate then compile `input` against `variables`.
///
/// Every variable is attempted even after a failure so that one pass reports
/// every problem. Leftover keys are then classified in sorted order.
pub fn process_variable_list(
    input: &ConfigMap,
    variables: &[VariableRef],
    removed: &RemovedTable,
    policy: &UnknownKeyPolicy,
) -> Result<Processed> {
    let mut diagnostics = Diagnostics::new();
    let mut working = input.unlocked();
    let mut finalized = ConfigMap::new();

    let migration = migrate(&mut working, &mut diagnostics)?;

    for variable in variables {
        let ctx = CompileContext {
            working: &working,
            finalized: &finalized,
        };
        match variable.compile(&ctx) {
            Ok(compiled) => {
                for key in &compiled.consumed {
                    working.remove(key)?;
                }
                diagnostics.warnings.extend(compiled.warnings);
                finalized.insert(variable.name(), compiled.value)?;
            }
            Err(error) => {
                diagnostics.error(Diagnostic::for_key(
                    DiagnosticKind::Compile,
                    variable.name(),
                    error.0,
                ));
            }
        }
    }

    // Translated keys no variable in this list consumed still carry the
    // layer's legacy setting.
    for key in migration.produced_keys() {
        if let Some(value) = working.remove(key)? {
            finalized.insert(key, value)?;
        }
    }

    let mut leftovers: Vec<&str> = working.keys().collect();
    leftovers.sort_unstable();
    for key in leftovers {
        if SpecialKeys::contains(key) {
            continue;
        }
        if let Some(note) = removed.get(key) {
            diagnostics.warn(Diagnostic::for_key(
                DiagnosticKind::Removed,
                key,
                format!("'{key}' has been removed: {note}"),
            ));
        } else if !policy.is_exempt(key) {
            diagnostics.warn(Diagnostic::for_key(
                DiagnosticKind::UnknownKey,
                key,
                format!("Unknown key '{key}' provided."),
            ));
        }
    }

    if migration.translated_macros {
        finalize_macros(&mut finalized)?;
    }

    tracing::debug!(
        variables = variables.len(),
        warnings = diagnostics.warnings.len(),
        errors = diagnostics.errors.len(),
        "Processed variable list"
    );

    Ok(Processed {
        values: finalized.lock(),
        diagnostics,
    })
}
