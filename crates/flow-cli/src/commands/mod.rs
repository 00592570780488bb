//! Command implementations for flow-cli

pub mod interactive;
pub mod meta;
pub mod resolve;
pub mod vars;

pub use interactive::run_interactive;
pub use meta::run_meta;
pub use resolve::run_resolve;
pub use vars::run_vars;

use flow_config::{Config, ConfigLoader, PdkRootLocator};

use crate::cli::OutputFormat;
use crate::error::Result;

/// A loader over the built-in catalog, locating PDKs from the environment.
pub(crate) fn loader() -> ConfigLoader {
    ConfigLoader::new(flow_vars::catalog()).with_locator(PdkRootLocator::from_env())
}

/// Render a configuration in the requested format.
pub(crate) fn render(config: &Config, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => config.to_json_string()?,
        OutputFormat::Yaml => serde_yaml::to_string(config)?,
        OutputFormat::Markdown => config.to_markdown()?,
    })
}
