//! Markdown reference tables for variable lists

use std::fmt::Write;

use flow_config::Value;

use crate::variable::Variable;

fn escape(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn default_cell(default: Option<&Value>) -> String {
    match default {
        None | Some(Value::Null) => String::new(),
        Some(value) => format!("`{}`", escape(&value.to_string())),
    }
}

/// Render variables as a markdown table, one row per variable in order.
pub fn render_reference(variables: &[Variable]) -> String {
    let mut out = String::from("| Variable Name | Type | Description | Default | Units |\n");
    out.push_str("| - | - | - | - | - |\n");

    for variable in variables {
        let mut name = format!("`{}`", variable.name);
        if !variable.deprecated_names.is_empty() {
            let old: Vec<_> = variable
                .deprecated_names
                .iter()
                .map(|n| format!("`{n}`"))
                .collect();
            let _ = write!(name, "<br>Deprecated: {}", old.join(", "));
        }
        let _ = writeln!(
            out,
            "| {name} | {} | {} | {} | {} |",
            escape(&variable.var_type.to_string()),
            escape(&variable.description),
            default_cell(variable.default.as_ref()),
            variable.units.as_deref().unwrap_or(""),
        );
    }
    out
}
