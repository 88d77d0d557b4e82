//! Error types for camera acquisition.

use thiserror::Error;

/// Fatal camera session failures.
///
/// Each of these stops the scanner; the user has to start it again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// The user or platform refused camera access
    #[error("camera permission denied: {message}")]
    PermissionDenied {
        /// Platform message
        message: String,
    },

    /// No camera device is available
    #[error("no camera device found: {message}")]
    NoDevice {
        /// Platform message
        message: String,
    },

    /// Every rung of the constraint ladder was rejected
    #[error("camera rejected all {attempts} constraint profiles")]
    ConstraintsExhausted {
        /// Number of profiles tried
        attempts: usize,
    },

    /// Any other decoder failure
    #[error("decoder error: {message}")]
    Decoder {
        /// Platform message
        message: String,
    },
}

impl CameraError {
    /// Human-readable message for the user-facing layer.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied { .. } => "Camera access denied. Please allow camera permissions.",
            Self::NoDevice { .. } => "No camera found on this device.",
            Self::ConstraintsExhausted { .. } => {
                "Camera not compatible. Try a different device or browser."
            }
            Self::Decoder { .. } => {
                "Failed to access camera. Please check permissions and try again."
            }
        }
    }
}

/// Result type alias for camera operations.
pub type Result<T> = std::result::Result<T, CameraError>;
