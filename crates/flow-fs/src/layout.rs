//! On-disk layout of an installed PDK
//!
//! ```text
//! <pdk_root>/
//!   <pdk>/
//!     libs.tech/openlane/
//!       config.tcl            PDK base configuration
//!       <scl>/config.tcl      standard cell library overrides
//! ```

use crate::{NormalizedPath, PdkPath, Result, io};

/// Locates the configuration files of one PDK under a PDK root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdkLayout {
    root: NormalizedPath,
    pdk: String,
}

impl PdkLayout {
    pub fn new(root: impl Into<NormalizedPath>, pdk: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            pdk: pdk.into(),
        }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn pdk(&self) -> &str {
        &self.pdk
    }

    /// `<pdk_root>/<pdk>`
    pub fn pdk_path(&self) -> NormalizedPath {
        self.root.join(&self.pdk)
    }

    /// `<pdk_root>/<pdk>/libs.tech/openlane`
    pub fn flow_dir(&self) -> NormalizedPath {
        self.pdk_path()
            .join(PdkPath::LibsTech.as_str())
            .join(PdkPath::FlowDir.as_str())
    }

    /// The PDK base configuration file.
    pub fn pdk_config(&self) -> NormalizedPath {
        self.flow_dir().join(PdkPath::ConfigFile.as_str())
    }

    /// The configuration file of standard cell library `scl`.
    pub fn scl_config(&self, scl: &str) -> NormalizedPath {
        self.flow_dir().join(scl).join(PdkPath::ConfigFile.as_str())
    }

    /// Whether the PDK directory itself exists.
    pub fn exists(&self) -> bool {
        self.pdk_path().exists()
    }

    /// Names of root entries sharing the PDK name as a prefix, for diagnosing
    /// typos and version-suffixed installs.
    pub fn similar_names(&self) -> Result<Vec<String>> {
        let names = io::entries_with_prefix(&self.root, &self.pdk)?;
        tracing::debug!(pdk = %self.pdk, candidates = ?names, "Searched for similarly-named PDKs");
        Ok(names)
    }
}
