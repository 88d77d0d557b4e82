//! Core error types for the Partscan application.
//!
//! This module defines the central error type used across all subsystems.
//! Each subsystem error is represented as a variant for clear error propagation.

use thiserror::Error;

/// Central error type for all Partscan operations.
///
/// Subsystem crates keep their own typed errors; this type is what crosses
/// crate boundaries once a failure has been reported to the user.
#[derive(Error, Debug)]
pub enum PartscanError {
    /// Configuration errors (file loading, parsing, validation)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Presentation layer errors (clipboard, link opening)
    #[error("presentation error: {0}")]
    Presentation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// I/O error reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `PartscanError`.
pub type Result<T> = std::result::Result<T, PartscanError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PartscanError::Presentation("clipboard unavailable".to_string());
        assert_eq!(err.to_string(), "presentation error: clipboard unavailable");

        let err = ConfigError::InvalidValue {
            field: "camera".to_string(),
            reason: "minimum resolution exceeds maximum".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value for camera: minimum resolution exceeds maximum"
        );
    }

    #[test]
    fn test_error_from_config() {
        let config_err = ConfigError::NoConfigDir;
        let err: PartscanError = config_err.into();
        assert!(matches!(err, PartscanError::Config(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed");
        let err: PartscanError = io_err.into();
        assert!(matches!(err, PartscanError::Io(_)));
    }
}
