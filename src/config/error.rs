use thiserror::Error;

/// Failures while locating, parsing or validating the settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required TOML file is missing
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// `field` is the dotted settings path, e.g. `media.blob.endpoint`
    #[error("Invalid {field}: {message}")]
    ValidationError { field: String, message: String },

    /// `ASTRO_APP_ENV` (or `--env`) names no known environment
    #[error("Unknown environment: {0}")]
    InvalidEnvironment(String),

    /// `ASTRO_CONFIG_DIR` and `ASTRO_CONFIG_FILE` were both set
    #[error("Conflicting configuration sources: {0}")]
    ConflictingSources(String),

    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        ConfigError::FileNotFound(path.into())
    }

    pub fn conflicting_sources(message: impl Into<String>) -> Self {
        ConfigError::ConflictingSources(message.into())
    }
}
