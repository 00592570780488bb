//! Minimal variables for exercising the resolver without a real catalog

#![allow(dead_code)]

use std::sync::Arc;

use flow_config::{
    Catalog, CompileContext, CompileError, Compiled, ConfigLoader, PdkRootLocator, RemovedTable,
    Value, VariableRef, VariableSpec,
};

/// Takes its raw value unchanged.
pub struct Raw {
    name: &'static str,
    default: Option<Value>,
    optional: bool,
}

impl VariableSpec for Raw {
    fn name(&self) -> &str {
        self.name
    }

    fn compile(&self, ctx: &CompileContext<'_>) -> Result<Compiled, CompileError> {
        match ctx.working.get(self.name) {
            Some(value) if !value.is_null() => Ok(Compiled::new(value.clone()).consuming(self.name)),
            _ => match (&self.default, self.optional) {
                (Some(default), _) => Ok(Compiled::new(default.clone()).consuming(self.name)),
                (None, true) => Ok(Compiled::new(Value::Null).consuming(self.name)),
                (None, false) => Err(CompileError::new(format!(
                    "Required variable '{}' did not get a specified value.",
                    self.name
                ))),
            },
        }
    }
}

pub fn required(name: &'static str) -> VariableRef {
    Arc::new(Raw {
        name,
        default: None,
        optional: false,
    })
}

pub fn optional(name: &'static str) -> VariableRef {
    Arc::new(Raw {
        name,
        default: None,
        optional: true,
    })
}

pub fn defaulted(name: &'static str, default: &'static str) -> VariableRef {
    Arc::new(Raw {
        name,
        default: Some(Value::from(default)),
        optional: false,
    })
}

pub fn catalog() -> Catalog {
    Catalog::new(vec![
        required("PDK"),
        required("STD_CELL_LIBRARY"),
        required("PDK_ROOT"),
        required("VDD_PIN"),
        required("GND_PIN"),
        required("DEFAULT_CORNER"),
        required("PLACE_SITE"),
        required("RT_MAX_LAYER"),
        optional("CELL_LEFS"),
    ])
    .with_technology_removed(RemovedTable::new().with("GLB_RT_L1_ADJUSTMENT", "Use GRT_LAYER_ADJUSTMENTS."))
    .with_flow_common(flow_variables())
    .with_removed(RemovedTable::new().with("GLB_RT_MAXLAYER", "Use RT_MAX_LAYER instead."))
}

pub fn flow_variables() -> Vec<VariableRef> {
    vec![
        optional("DESIGN_DIR"),
        required("DESIGN_NAME"),
        defaulted("CLOCK_PERIOD", "10"),
        optional("VERILOG_FILES"),
        optional("GRT_REPAIR_ANTENNAS"),
        optional("MACROS"),
    ]
}

pub fn loader() -> ConfigLoader {
    ConfigLoader::new(catalog()).with_locator(PdkRootLocator::isolated())
}
