//! Wire envelope of the `GET /parts/{token}` route.

use crate::error::{LookupError, LookupErrorKind, Result};
use partscan_core::{PartRecord, PartToken};
use serde::{Deserialize, Serialize};

/// Machine-readable failure code carried next to the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Part or data absent
    NotFound,
    /// Source misconfigured (missing id column, missing credentials)
    Configuration,
    /// Source rejected the request as malformed
    MalformedSource,
    /// Upstream or network failure
    Transport,
}

impl From<&LookupError> for ErrorCode {
    fn from(err: &LookupError) -> Self {
        match (err.kind(), err) {
            (_, LookupError::MalformedSource(_)) => Self::MalformedSource,
            (LookupErrorKind::NotFound, _) => Self::NotFound,
            (LookupErrorKind::Configuration, _) => Self::Configuration,
            (LookupErrorKind::Transport, _) => Self::Transport,
        }
    }
}

/// `{ success, data?, error?, code? }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResponse {
    /// Whether a record was resolved
    pub success: bool,
    /// The resolved record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PartRecord>,
    /// Human-readable failure message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Failure category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl LookupResponse {
    /// Successful envelope.
    #[must_use]
    pub fn found(record: PartRecord) -> Self {
        Self {
            success: true,
            data: Some(record),
            error: None,
            code: None,
        }
    }

    /// Failure envelope with the HTTP status to answer with.
    #[must_use]
    pub fn failure(err: &LookupError) -> (u16, Self) {
        let body = Self {
            success: false,
            data: None,
            error: Some(err.to_string()),
            code: Some(ErrorCode::from(err)),
        };
        (err.http_status(), body)
    }

    /// Interpret a response received with `status` for `token`.
    ///
    /// # Errors
    /// Maps the status and code back onto the matching [`LookupError`].
    pub fn into_result(self, status: u16, token: &PartToken) -> Result<PartRecord> {
        if (200..300).contains(&status) && self.success {
            return self.data.ok_or_else(|| {
                LookupError::ParseError("successful response without data".to_string())
            });
        }

        let message = self
            .error
            .unwrap_or_else(|| format!("lookup failed with status {status}"));

        match (status, self.code) {
            (404, _) | (_, Some(ErrorCode::NotFound)) => Err(LookupError::PartNotFound {
                token: token.to_string(),
            }),
            (400, _) | (_, Some(ErrorCode::MalformedSource)) => {
                Err(LookupError::MalformedSource(message))
            }
            (_, Some(ErrorCode::Configuration)) => Err(LookupError::NotConfigured(message)),
            _ => Err(LookupError::Transport { status, message }),
        }
    }
}
