//! Decoder adapter boundary.
//!
//! The platform camera and QR decoding live behind [`DecoderAdapter`]. The
//! adapter only acquires a stream for a profile, reports what it decodes,
//! and releases the stream again. Retry policy belongs to the negotiator.

use crate::error::CameraError;
use crate::profile::ConstraintProfile;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure categories a decoder can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecoderErrorKind {
    /// Camera access refused
    PermissionDenied,
    /// No camera present
    NoDevice,
    /// The device cannot satisfy the requested constraints
    ConstraintIncompatible,
    /// Anything else
    Other,
}

impl DecoderErrorKind {
    /// Get the string representation of the error kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission_denied",
            Self::NoDevice => "no_device",
            Self::ConstraintIncompatible => "constraint_incompatible",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for DecoderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure reported by the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderFailure {
    /// Failure category
    pub kind: DecoderErrorKind,
    /// Platform message
    pub message: String,
}

impl DecoderFailure {
    /// Create a failure of the given kind.
    #[must_use]
    pub fn new(kind: DecoderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Convert into the fatal session error for this kind.
    ///
    /// Constraint rejections only become fatal once the ladder is exhausted,
    /// which the negotiator decides; here they map to a generic decoder error.
    #[must_use]
    pub fn into_camera_error(self) -> CameraError {
        match self.kind {
            DecoderErrorKind::PermissionDenied => CameraError::PermissionDenied {
                message: self.message,
            },
            DecoderErrorKind::NoDevice => CameraError::NoDevice {
                message: self.message,
            },
            DecoderErrorKind::ConstraintIncompatible | DecoderErrorKind::Other => {
                CameraError::Decoder {
                    message: self.message,
                }
            }
        }
    }
}

/// Events produced by a running decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoderEvent {
    /// A QR code was decoded
    Decoded(String),
    /// The running stream failed
    Failed(DecoderFailure),
}

/// Platform camera + QR decoding capability.
///
/// `next_event` is polled inside `tokio::select!`, so it must be
/// cancellation safe: dropping the future must not lose a decoded frame
/// that was already consumed from the platform.
#[async_trait]
pub trait DecoderAdapter: Send {
    /// Acquire a camera stream satisfying `profile` and start decoding.
    ///
    /// # Errors
    /// Returns the platform failure when the stream cannot be acquired.
    async fn open(&mut self, profile: &ConstraintProfile) -> Result<(), DecoderFailure>;

    /// Wait for the next decode or failure. `None` means the source ended.
    async fn next_event(&mut self) -> Option<DecoderEvent>;

    /// Release every acquired track. Must be idempotent.
    async fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_maps_to_camera_error() {
        let err = DecoderFailure::new(DecoderErrorKind::PermissionDenied, "NotAllowedError")
            .into_camera_error();
        assert_eq!(
            err,
            CameraError::PermissionDenied {
                message: "NotAllowedError".to_string()
            }
        );

        let err = DecoderFailure::new(DecoderErrorKind::NoDevice, "NotFoundError").into_camera_error();
        assert!(matches!(err, CameraError::NoDevice { .. }));

        let err = DecoderFailure::new(DecoderErrorKind::Other, "AbortError").into_camera_error();
        assert!(matches!(err, CameraError::Decoder { .. }));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(
            DecoderErrorKind::ConstraintIncompatible.to_string(),
            "constraint_incompatible"
        );
    }
}
