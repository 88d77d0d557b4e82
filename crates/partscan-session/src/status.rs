//! Lookup status of the session's current part.

use partscan_core::{PartRecord, PartToken};
use partscan_lookup::{LookupError, LookupErrorKind};
use serde::Serialize;

/// Where the current lookup stands.
///
/// `Idle` only exists before the first scan; every later state is either
/// in flight or one of the three outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LookupStatus {
    /// Nothing scanned yet
    #[default]
    Idle,
    /// Waiting for the lookup of `token`
    InFlight {
        /// Token being resolved
        token: PartToken,
    },
    /// The token resolved to a record
    Resolved {
        /// Token that was resolved
        token: PartToken,
        /// The resolved record
        record: PartRecord,
    },
    /// The token is not in the table (informational)
    NotFound {
        /// Token that was looked up
        token: PartToken,
        /// Message for the user
        message: String,
    },
    /// Lookup failed; the user may retry
    Failed {
        /// Token that was looked up
        token: PartToken,
        /// Configuration or transport
        kind: LookupErrorKind,
        /// Message for the user
        message: String,
    },
}

impl LookupStatus {
    /// Status after a lookup of `token` finished with `result`.
    #[must_use]
    pub fn from_outcome(token: PartToken, result: Result<PartRecord, LookupError>) -> Self {
        match result {
            Ok(record) => Self::Resolved { token, record },
            Err(err) if err.is_not_found() => Self::NotFound {
                token,
                message: err.to_string(),
            },
            Err(err) => Self::Failed {
                token,
                kind: err.kind(),
                message: err.to_string(),
            },
        }
    }

    /// The current record, present only when resolved.
    #[must_use]
    pub fn record(&self) -> Option<&PartRecord> {
        match self {
            Self::Resolved { record, .. } => Some(record),
            _ => None,
        }
    }

    /// Token of the latest lookup.
    #[must_use]
    pub fn token(&self) -> Option<&PartToken> {
        match self {
            Self::Idle => None,
            Self::InFlight { token }
            | Self::Resolved { token, .. }
            | Self::NotFound { token, .. }
            | Self::Failed { token, .. } => Some(token),
        }
    }

    /// True while a lookup is outstanding.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight { .. })
    }

    /// Short state name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InFlight { .. } => "in_flight",
            Self::Resolved { .. } => "resolved",
            Self::NotFound { .. } => "not_found",
            Self::Failed { .. } => "failed",
        }
    }
}
