//! The interactive command

use flow_config::source::parse_override;
use flow_config::{Error, InteractiveRequest, Value};

use crate::cli::{OutputFormat, PdkArgs};
use crate::commands::{loader, render};
use crate::error::Result;

/// Build a configuration from the PDK and the flow defaults and print it.
pub fn run_interactive(
    design_name: &str,
    pdk: &PdkArgs,
    overrides: &[String],
    format: OutputFormat,
) -> Result<()> {
    let pdk_name = pdk.pdk.clone().ok_or(Error::MissingPdk)?;
    let mut request = InteractiveRequest::new(design_name, pdk_name);
    request.scl = pdk.scl.clone();
    request.pdk_root = pdk.pdk_root.clone();
    for assignment in overrides {
        let (key, value) = parse_override(assignment)?;
        request = request.with_value(key, Value::String(value));
    }

    let config = loader().interactive(request)?;
    println!("{}", render(&config, format)?.trim_end());
    Ok(())
}
