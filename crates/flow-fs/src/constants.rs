//! Fixed path segments of an installed PDK.

use std::path::Path;

/// Path segments between a PDK directory and its flow configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdkPath {
    /// The `libs.tech` directory holding per-tool technology data
    LibsTech,
    /// The `openlane` directory under `libs.tech`
    FlowDir,
    /// The legacy-format configuration file name
    ConfigFile,
}

impl PdkPath {
    /// Get the string representation of the segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LibsTech => "libs.tech",
            Self::FlowDir => "openlane",
            Self::ConfigFile => "config.tcl",
        }
    }
}

impl AsRef<Path> for PdkPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for PdkPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for PdkPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
