//! Error types for flow-config

use std::fmt;
use std::path::PathBuf;

use crate::diagnostic::Diagnostic;

/// Result type for flow-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// The configuration layer a resolution pass was working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigLayer {
    /// Locating the PDK itself
    Pdk,
    /// The PDK and standard cell library configuration files
    PdkFiles,
    /// The user's design configuration
    Design,
    /// Interactive-mode flow defaults
    Defaults,
}

impl ConfigLayer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdk => "PDK configuration",
            Self::PdkFiles => "PDK configuration files",
            Self::Design => "design configuration file",
            Self::Defaults => "default configuration",
        }
    }
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolution pass that finished with one or more errors.
///
/// Carries every warning and every error of the pass so a single report
/// describes all problems of the layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidConfig {
    pub layer: ConfigLayer,
    pub warnings: Vec<Diagnostic>,
    pub errors: Vec<Diagnostic>,
}

impl fmt::Display for InvalidConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The following errors were encountered in the {}:",
            self.layer
        )?;
        for error in &self.errors {
            write!(f, "\n\t* {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for InvalidConfig {}

/// Errors that can occur while resolving a configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Aggregated per-layer warnings and errors
    #[error(transparent)]
    Invalid(#[from] InvalidConfig),

    #[error("The pdk argument is required as the configuration object lacks a 'PDK' key.")]
    MissingPdk,

    #[error(
        "The pdk_root argument is required as no PDK package manager was found and PDK_ROOT is not set."
    )]
    MissingPdkRoot,

    #[error(
        "Passing design folders as arguments is unsupported: pass the configuration file directly instead of {path}"
    )]
    DirectoryInput { path: PathBuf },

    #[error("Unsupported configuration file extension '{extension}' for '{path}'.")]
    UnsupportedExtension { path: PathBuf, extension: String },

    #[error("The design_dir argument is required when loading a configuration from a mapping.")]
    DesignDirRequired,

    #[error("The design_dir argument is not supported when loading a configuration from a file.")]
    DesignDirUnsupported,

    #[error("Failed to parse {format} configuration at {path}: {message}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("Invalid override '{0}': expected NAME=VALUE")]
    InvalidOverride(String),

    #[error("'{key}' references '{target}', which is not defined before it")]
    InvalidReference { key: String, target: String },

    #[error("Failed to evaluate legacy configuration at {path}: {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: flow_tcl::Error,
    },

    #[error("Configuration is locked: refusing to modify '{key}'")]
    Locked { key: String },

    /// Broken data or a broken invariant, never a user-input problem
    #[error("Fatal error: {0}")]
    Fatal(String),

    #[error(transparent)]
    Fs(#[from] flow_fs::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// The aggregated report, if this is a validation failure.
    pub fn as_invalid(&self) -> Option<&InvalidConfig> {
        match self {
            Self::Invalid(invalid) => Some(invalid),
            _ => None,
        }
    }
}
