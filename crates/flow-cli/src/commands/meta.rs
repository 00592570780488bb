//! The meta command

use std::path::Path;

use flow_config::{FlowSelection, Meta};

use crate::error::{CliError, Result};

/// Print the metadata record of a configuration file as JSON.
pub fn run_meta(config: &Path, flow: Option<&str>) -> Result<()> {
    let flow = flow.map(|name| FlowSelection::Name(name.to_string()));
    let meta = Meta::from_file(config, flow)?.ok_or_else(|| {
        CliError::user(format!(
            "'{}' is a Tcl configuration file and carries no metadata.",
            config.display()
        ))
    })?;
    println!("{}", serde_json::to_string_pretty(&meta.to_value().to_json())?);
    Ok(())
}
