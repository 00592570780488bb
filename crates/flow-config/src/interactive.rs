//! Configurations built from defaults for exploratory sessions
//!
//! [`ConfigLoader::interactive`] returns its configuration as an explicit
//! handle. The most recent one is also published to a process-wide slot for
//! tooling that cannot thread a handle through; pipelines should not rely
//! on it, since concurrent sessions overwrite each other.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::Config;
use crate::diagnostic::log_warnings;
use crate::error::ConfigLayer;
use crate::loader::ConfigLoader;
use crate::meta::Meta;
use crate::value::{Mapping, Value};
use crate::Result;

static CURRENT_INTERACTIVE: RwLock<Option<Arc<Config>>> = RwLock::new(None);

/// The configuration most recently built by [`ConfigLoader::interactive`].
pub fn current_interactive() -> Option<Arc<Config>> {
    CURRENT_INTERACTIVE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replace the published configuration, returning the previous one.
pub fn set_current_interactive(config: Option<Arc<Config>>) -> Option<Arc<Config>> {
    let mut slot = CURRENT_INTERACTIVE
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *slot, config)
}

/// Arguments for an interactive configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractiveRequest {
    pub design_name: String,
    pub pdk: String,
    pub scl: Option<String>,
    pub pdk_root: Option<PathBuf>,
    /// Raw values layered over the PDK before validation
    pub overrides: Mapping,
}

impl InteractiveRequest {
    pub fn new(design_name: impl Into<String>, pdk: impl Into<String>) -> Self {
        Self {
            design_name: design_name.into(),
            pdk: pdk.into(),
            ..Self::default()
        }
    }

    pub fn with_scl(mut self, scl: impl Into<String>) -> Self {
        self.scl = Some(scl.into());
        self
    }

    pub fn with_pdk_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.pdk_root = Some(root.into());
        self
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }
}

pub const DESIGN_NAME: &str = "DESIGN_NAME";

impl ConfigLoader {
    /// Build a configuration from the PDK and the common flow defaults,
    /// with no design file involved.
    pub fn interactive(&self, request: InteractiveRequest) -> Result<Arc<Config>> {
        let InteractiveRequest {
            design_name,
            pdk,
            scl,
            pdk_root,
            mut overrides,
        } = request;

        let root = self.locator().locate(pdk_root.as_deref())?;
        let pdk_config = self.load_pdk_at(&pdk, scl.as_deref(), &root)?;

        overrides.insert(DESIGN_NAME.to_string(), Value::String(design_name));
        let merged = pdk_config.values.with_overrides(overrides);
        let variables = self.catalog().interactive_variables();
        let processed = self.process(&merged, &variables, &self.catalog().removed)?;
        let (values, warnings) = processed.into_result(ConfigLayer::Defaults)?;
        log_warnings(
            "Loading the default configuration has generated the following warnings:",
            &warnings,
            true,
        );

        let config = Arc::new(Config::new(values, Meta::default()).into_interactive());
        set_current_interactive(Some(Arc::clone(&config)));
        tracing::debug!(pdk = %pdk, "Published interactive configuration");
        Ok(config)
    }
}
