//! Shared types used across the Partscan application.
//!
//! This module defines the domain values that flow between the decoder,
//! the token extractor, the lookup client and the scan session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical part-number string derived from scanned text.
///
/// Surrounding whitespace is removed on construction. Comparison against
/// tabular data goes through [`PartToken::normalized`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartToken(String);

impl PartToken {
    /// Create a token, trimming surrounding whitespace.
    #[must_use]
    pub fn new(token: impl AsRef<str>) -> Self {
        Self(token.as_ref().trim().to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased form used for case-insensitive matching.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    /// True when the token carries no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PartToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PartToken {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A single successful decode produced by the decoder.
///
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    raw_text: String,
    scanned_at: DateTime<Utc>,
}

impl ScanEvent {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self::at(raw_text, Utc::now())
    }

    /// Create an event with an explicit timestamp.
    #[must_use]
    pub fn at(raw_text: impl Into<String>, scanned_at: DateTime<Utc>) -> Self {
        Self {
            raw_text: raw_text.into(),
            scanned_at,
        }
    }

    /// The decoded text exactly as the decoder reported it.
    #[must_use]
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// When the decode happened.
    #[must_use]
    pub fn scanned_at(&self) -> DateTime<Utc> {
        self.scanned_at
    }
}

/// Structured part information resolved from the tabular source.
///
/// Serialized with the field names the lookup route uses on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartRecord {
    /// Part identifier as written in the source table
    pub id: String,
    /// Human-readable part name
    pub name: String,
    /// Stocked quantity
    pub quantity: u32,
    /// Storage position
    pub position: String,
    /// Linked CAD assembly reference (empty when absent)
    pub cad_assembly: String,
}

/// Camera-facing preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Rear camera
    #[default]
    Environment,
    /// Front camera
    User,
}

impl FacingMode {
    /// The opposite camera.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Environment => Self::User,
            Self::User => Self::Environment,
        }
    }

    /// Label shown next to the camera view.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Environment => "Back Camera",
            Self::User => "Front Camera",
        }
    }

    /// Wire name of this facing mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Environment => "environment",
            Self::User => "user",
        }
    }
}

impl fmt::Display for FacingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_token_trims_and_normalizes() {
        let token = PartToken::new("  HL-012A\n");
        assert_eq!(token.as_str(), "HL-012A");
        assert_eq!(token.normalized(), "hl-012a");
        assert_eq!(token.to_string(), "HL-012A");
        assert!(!token.is_empty());
        assert!(PartToken::new("   ").is_empty());
    }

    #[test]
    fn test_part_record_wire_names() {
        let record = PartRecord {
            id: "HL-012A".to_string(),
            name: "Bracket".to_string(),
            quantity: 15,
            position: "Shelf3".to_string(),
            cad_assembly: String::new(),
        };

        let json = serde_json::to_value(&record).expect("serialize record");
        assert_eq!(json["cadAssembly"], "");
        assert_eq!(json["quantity"], 15);
    }

    #[test]
    fn test_facing_mode_toggle_and_labels() {
        assert_eq!(FacingMode::Environment.toggled(), FacingMode::User);
        assert_eq!(FacingMode::User.toggled(), FacingMode::Environment);
        assert_eq!(FacingMode::Environment.label(), "Back Camera");
        assert_eq!(FacingMode::User.label(), "Front Camera");

        let json = serde_json::to_string(&FacingMode::User).expect("serialize facing");
        assert_eq!(json, "\"user\"");
    }

    #[test]
    fn test_scan_event_keeps_raw_text() {
        let event = ScanEvent::new("  padded  ");
        assert_eq!(event.raw_text(), "  padded  ");
    }
}
