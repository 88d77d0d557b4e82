//! Error types for part lookup.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while resolving a part token.
#[derive(Error, Debug)]
pub enum LookupError {
    /// No body row carries the token in its id column
    #[error("part number {token} not found in the sheet")]
    PartNotFound {
        /// Token that was looked up
        token: String,
    },

    /// The source returned no rows at all
    #[error("no data found in the sheet")]
    EmptyTable,

    /// The header row has no `id` column
    #[error("ID column not found in sheet, please ensure your sheet has an 'ID' column (headers: {headers:?})")]
    MissingIdColumn {
        /// Normalized headers that were present
        headers: Vec<String>,
    },

    /// The source rejected the request as malformed (bad sheet name or range)
    #[error("malformed source configuration: {0}")]
    MalformedSource(String),

    /// Required settings are missing
    #[error("lookup source not configured: {0}")]
    NotConfigured(String),

    /// Non-success response from the remote side
    #[error("lookup failed: status {status}, {message}")]
    Transport {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response parsing error
    #[error("failed to parse lookup response: {0}")]
    ParseError(String),
}

/// Coarse category of a lookup failure, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupErrorKind {
    /// Informational: the part is simply not in the table
    NotFound,
    /// The data source is misconfigured
    Configuration,
    /// Network or remote failure, retryable by the user
    Transport,
}

impl LookupError {
    /// Category of this failure.
    #[must_use]
    pub fn kind(&self) -> LookupErrorKind {
        match self {
            Self::PartNotFound { .. } | Self::EmptyTable => LookupErrorKind::NotFound,
            Self::MissingIdColumn { .. } | Self::MalformedSource(_) | Self::NotConfigured(_) => {
                LookupErrorKind::Configuration
            }
            Self::Transport { .. } | Self::Network(_) | Self::ParseError(_) => {
                LookupErrorKind::Transport
            }
        }
    }

    /// True for the informational not-found outcomes.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == LookupErrorKind::NotFound
    }

    /// HTTP status the lookup route answers with for this failure.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::PartNotFound { .. } | Self::EmptyTable => 404,
            Self::MalformedSource(_) => 400,
            Self::MissingIdColumn { .. } | Self::NotConfigured(_) => 500,
            Self::Transport { status, .. } => *status,
            Self::Network(_) | Self::ParseError(_) => 502,
        }
    }
}

/// Result type alias for lookup operations.
pub type Result<T> = std::result::Result<T, LookupError>;
