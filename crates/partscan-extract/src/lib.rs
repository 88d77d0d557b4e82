//! Partscan Extract - turns noisy scanned text into a canonical part number.
//!
//! Scanned QR payloads rarely contain just the part number: they carry labels,
//! URLs, descriptions or several codes at once. The extractor evaluates an
//! ordered list of [`TokenRule`]s against the whole text and returns the first
//! match of the first rule that matches anything. When nothing matches, the
//! trimmed input itself becomes the token, so extraction never fails.
//!
//! # Example
//!
//! ```rust
//! use partscan_extract::extract;
//!
//! assert_eq!(extract("see part AB-123C for ref").as_str(), "AB-123C");
//! assert_eq!(extract("PN: XY-9911").as_str(), "XY-9911");
//! assert_eq!(extract("  free text  ").as_str(), "free text");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod rules;

use once_cell::sync::Lazy;
use partscan_core::PartToken;

pub use rules::{default_rules, Capture, RuleKind, TokenRule};

/// Outcome of running the extractor over one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// The canonical token
    pub token: PartToken,

    /// Rule that produced the token, `None` for the verbatim fallback
    pub rule: Option<RuleKind>,
}

impl Extraction {
    /// True when no rule matched and the input was used verbatim.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.rule.is_none()
    }
}

/// Ordered, first-match-wins token extractor.
#[derive(Debug, Clone)]
pub struct TokenExtractor {
    rules: Vec<TokenRule>,
}

impl Default for TokenExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenExtractor {
    /// Create an extractor with the default rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(default_rules())
    }

    /// Create an extractor with a custom, already ordered rule set.
    #[must_use]
    pub fn with_rules(rules: Vec<TokenRule>) -> Self {
        Self { rules }
    }

    /// Rules in priority order.
    #[must_use]
    pub fn rules(&self) -> &[TokenRule] {
        &self.rules
    }

    /// Extract a token, reporting which rule produced it.
    #[must_use]
    pub fn extract_detailed(&self, raw_text: &str) -> Extraction {
        let matched = self
            .rules
            .iter()
            .find_map(|rule| rule.apply(raw_text).map(|value| (rule.kind, value)));

        match matched {
            Some((kind, value)) => {
                tracing::debug!(rule = kind.as_str(), token = %value, "Extracted part token");
                Extraction {
                    token: PartToken::new(value),
                    rule: Some(kind),
                }
            }
            None => {
                tracing::debug!("No token rule matched, using trimmed input");
                Extraction {
                    token: PartToken::new(raw_text),
                    rule: None,
                }
            }
        }
    }

    /// Extract a token from scanned text.
    #[must_use]
    pub fn extract(&self, raw_text: &str) -> PartToken {
        self.extract_detailed(raw_text).token
    }
}

static DEFAULT_EXTRACTOR: Lazy<TokenExtractor> = Lazy::new(TokenExtractor::new);

/// Extract a token with the default rule set.
#[must_use]
pub fn extract(raw_text: &str) -> PartToken {
    DEFAULT_EXTRACTOR.extract(raw_text)
}
