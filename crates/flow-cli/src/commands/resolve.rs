//! The resolve command

use std::fs;
use std::path::Path;

use colored::Colorize;
use flow_config::LoadOptions;

use crate::cli::{OutputFormat, PdkArgs};
use crate::commands::{loader, render};
use crate::error::Result;

/// Resolve a configuration file and print or write the final values.
pub fn run_resolve(
    config: &Path,
    pdk: &PdkArgs,
    overrides: &[String],
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let mut options = LoadOptions::new();
    options.overrides = overrides.to_vec();
    options.pdk = pdk.pdk.clone();
    options.pdk_root = pdk.pdk_root.clone();
    options.scl = pdk.scl.clone();

    let loader = loader();
    let flow = loader.catalog().flow_common.clone();
    let loaded = loader.load(config, &flow, &options)?;

    let mut text = render(&loaded.config, format)?;
    if !text.ends_with('\n') {
        text.push('\n');
    }
    match output {
        Some(path) => {
            fs::write(path, text)?;
            eprintln!(
                "{} Wrote configuration to {}",
                "OK".green().bold(),
                path.display().to_string().cyan()
            );
        }
        None => print!("{text}"),
    }
    Ok(())
}
