//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::constants::DimValidationError;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// A numeric variable was set but could not be parsed or was zero.
    #[error("invalid value '{value}' for {name}: expected a positive integer")]
    InvalidNumber { name: &'static str, value: String },

    /// Same-person threshold could not be parsed or is outside `[0, 1]`.
    #[error("invalid same-person threshold '{value}': must be a number between 0 and 1")]
    InvalidThreshold { value: String },

    /// A required environment variable was not set.
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },

    #[error("invalid embedding dimension: {0}")]
    InvalidDimension(#[from] DimValidationError),

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
