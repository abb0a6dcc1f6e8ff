//! Error types for configuration loading.

use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error while reading the configuration file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML or does not match the schema.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Settings could not be serialized back to TOML.
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
