//! The typed variable definition

use std::sync::Arc;

use flow_config::{
    CompileContext, CompileError, Compiled, Diagnostic, DiagnosticKind, Value, VariableRef,
    VariableSpec,
};

use crate::types::VarType;

/// Prefix of a default that copies the final value of an earlier variable.
pub const REF_DEFAULT_PREFIX: &str = "ref::$";

/// A named, typed configuration variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub var_type: VarType,
    pub description: String,
    pub default: Option<Value>,
    /// Older names still accepted, with a warning
    pub deprecated_names: Vec<String>,
    pub units: Option<String>,
    /// Whether the PDK is expected to provide the value
    pub pdk: bool,
}

impl Variable {
    pub fn new(name: impl Into<String>, var_type: VarType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            var_type,
            description: description.into(),
            default: None,
            deprecated_names: Vec::new(),
            units: None,
            pdk: false,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_deprecated_names(mut self, names: &[&str]) -> Self {
        self.deprecated_names = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn pdk(mut self) -> Self {
        self.pdk = true;
        self
    }

    pub fn into_ref(self) -> VariableRef {
        Arc::new(self)
    }

    fn invalid(&self, message: String) -> CompileError {
        CompileError::new(format!(
            "Value provided for variable '{}' of type {} is invalid: {message}",
            self.name, self.var_type
        ))
    }

    fn resolve_default(&self, default: &Value, ctx: &CompileContext<'_>) -> Result<Value, CompileError> {
        let target = match default {
            Value::String(s) => s.strip_prefix(REF_DEFAULT_PREFIX),
            _ => None,
        };
        let value = match target {
            Some(target) => ctx.finalized.get(target).cloned().ok_or_else(|| {
                CompileError::new(format!(
                    "Default value for variable '{}' references '{target}', which has not been set.",
                    self.name
                ))
            })?,
            None => default.clone(),
        };
        if value.is_null() && self.var_type.is_optional() {
            return Ok(Value::Null);
        }
        self.var_type.coerce(&value).map_err(|message| {
            CompileError::new(format!(
                "Default value for variable '{}' of type {} is invalid: {message}",
                self.name, self.var_type
            ))
        })
    }
}

impl VariableSpec for Variable {
    fn name(&self) -> &str {
        &self.name
    }

    fn compile(&self, ctx: &CompileContext<'_>) -> Result<Compiled, CompileError> {
        let mut consumed = Vec::new();
        let mut warnings = Vec::new();
        let mut raw = None;

        if let Some(value) = ctx.working.get(&self.name) {
            consumed.push(self.name.clone());
            if !value.is_null() {
                raw = Some(value);
            }
        }

        for old in &self.deprecated_names {
            let Some(value) = ctx.working.get(old) else {
                continue;
            };
            tracing::debug!(old = %old, new = %self.name, "Deprecated variable name used");
            consumed.push(old.clone());
            warnings.push(Diagnostic::for_key(
                DiagnosticKind::Deprecated,
                old.as_str(),
                format!(
                    "The configuration variable '{old}' is deprecated. Please check the docs for the usage on the replacement variable '{}'.",
                    self.name
                ),
            ));
            if raw.is_none() && !value.is_null() {
                raw = Some(value);
            }
        }

        let value = match (raw, &self.default) {
            (Some(raw), _) => self.var_type.coerce(raw).map_err(|e| self.invalid(e))?,
            (None, Some(default)) => self.resolve_default(default, ctx)?,
            (None, None) if self.var_type.is_optional() => Value::Null,
            (None, None) => {
                return Err(CompileError::new(format!(
                    "Required variable '{}' did not get a specified value.",
                    self.name
                )));
            }
        };

        Ok(Compiled {
            value,
            consumed,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_config::ConfigMap;
    use pretty_assertions::assert_eq;

    fn compile(variable: &Variable, working: &[(&str, Value)], finalized: &[(&str, Value)]) -> Result<Compiled, CompileError> {
        let working: ConfigMap = working.iter().cloned().collect();
        let finalized: ConfigMap = finalized.iter().cloned().collect();
        variable.compile(&CompileContext {
            working: &working,
            finalized: &finalized,
        })
    }

    fn fanout() -> Variable {
        Variable::new("MAX_FANOUT_CONSTRAINT", VarType::Int, "Max fanout.")
            .with_default(10)
            .with_deprecated_names(&["SYNTH_MAX_FANOUT"])
    }

    #[test]
    fn uses_value_under_its_name() {
        let out = compile(&fanout(), &[("MAX_FANOUT_CONSTRAINT", Value::from("6"))], &[]).unwrap();
        assert_eq!(out.value, Value::from(6));
        assert_eq!(out.consumed, vec!["MAX_FANOUT_CONSTRAINT"]);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn deprecated_name_warns_and_is_consumed() {
        let out = compile(&fanout(), &[("SYNTH_MAX_FANOUT", Value::from(4))], &[]).unwrap();
        assert_eq!(out.value, Value::from(4));
        assert_eq!(out.consumed, vec!["SYNTH_MAX_FANOUT"]);
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].kind, DiagnosticKind::Deprecated);
        assert_eq!(out.warnings[0].key.as_deref(), Some("SYNTH_MAX_FANOUT"));
    }

    #[test]
    fn current_name_wins_over_deprecated() {
        let out = compile(
            &fanout(),
            &[("MAX_FANOUT_CONSTRAINT", Value::from(8)), ("SYNTH_MAX_FANOUT", Value::from(4))],
            &[],
        )
        .unwrap();
        assert_eq!(out.value, Value::from(8));
        assert_eq!(out.consumed.len(), 2);
    }

    #[test]
    fn null_means_absent() {
        let out = compile(&fanout(), &[("MAX_FANOUT_CONSTRAINT", Value::Null)], &[]).unwrap();
        assert_eq!(out.value, Value::from(10));
        assert_eq!(out.consumed, vec!["MAX_FANOUT_CONSTRAINT"]);
    }

    #[test]
    fn required_without_value() {
        let variable = Variable::new("DESIGN_NAME", VarType::Str, "Name.");
        let err = compile(&variable, &[], &[]).unwrap_err();
        assert_eq!(err.0, "Required variable 'DESIGN_NAME' did not get a specified value.");
    }

    #[test]
    fn optional_without_value_is_null() {
        let variable = Variable::new("RT_CLOCK_MIN_LAYER", VarType::optional(VarType::Str), "Layer.");
        assert_eq!(compile(&variable, &[], &[]).unwrap().value, Value::Null);
    }

    #[test]
    fn invalid_value_message() {
        let err = compile(&fanout(), &[("MAX_FANOUT_CONSTRAINT", Value::from("many"))], &[]).unwrap_err();
        assert_eq!(
            err.0,
            "Value provided for variable 'MAX_FANOUT_CONSTRAINT' of type int is invalid: 'many' is not a valid integer"
        );
    }

    #[test]
    fn reference_defaults() {
        let variable = Variable::new("FP_PDN_VERTICAL_HALO", VarType::Decimal, "Halo.")
            .with_default("ref::$FP_PDN_HORIZONTAL_HALO");
        let out = compile(&variable, &[], &[("FP_PDN_HORIZONTAL_HALO", Value::from(10))]).unwrap();
        assert_eq!(out.value, Value::from(10));

        let err = compile(&variable, &[], &[]).unwrap_err();
        assert!(err.0.contains("references 'FP_PDN_HORIZONTAL_HALO'"), "{err}");
    }

    #[test]
    fn defaults_are_coerced() {
        let variable = Variable::new("CLOCK_PERIOD", VarType::Decimal, "Period.").with_default("10.0");
        assert_eq!(
            compile(&variable, &[], &[]).unwrap().value,
            Value::number_from_str("10.0").unwrap()
        );
    }

    #[test]
    fn compiled_values_compile_to_themselves() {
        let variable = Variable::new("FILL_CELL", VarType::list(VarType::Str), "Fill cells.");
        let first = compile(&variable, &[("FILL_CELL", Value::from("a b"))], &[]).unwrap();
        let second = compile(&variable, &[("FILL_CELL", first.value.clone())], &[]).unwrap();
        assert_eq!(first.value, second.value);
    }
}
