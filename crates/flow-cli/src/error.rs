//! Error types for flow-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from flow-config
    #[error(transparent)]
    Config(#[from] flow_config::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML rendering error
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// JSON rendering error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// The aggregated configuration report behind this error, if any.
    pub fn as_invalid(&self) -> Option<&flow_config::InvalidConfig> {
        match self {
            Self::Config(err) => err.as_invalid(),
            _ => None,
        }
    }
}
