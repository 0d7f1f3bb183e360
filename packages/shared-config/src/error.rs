//! Configuration error types

use thiserror::Error;

/// Errors raised while loading Marquee configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Missing required environment variable
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable could not be parsed
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),

    /// Environment variable is not a usable URL
    #[error("invalid URL format for {0}: {1}")]
    InvalidUrl(String, String),

    /// Values parsed but are not usable together
    #[error("configuration validation failed: {0}")]
    ValidationError(String),
}

impl ConfigError {
    /// Name of the offending environment variable, when known
    pub fn variable(&self) -> Option<&str> {
        match self {
            Self::MissingEnvVar(name) | Self::InvalidValue(name, _) | Self::InvalidUrl(name, _) => {
                Some(name)
            }
            Self::ValidationError(_) => None,
        }
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
