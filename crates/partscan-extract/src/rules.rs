//! Token recognition rules.
//!
//! Each rule is plain data: a compiled pattern plus a description of which
//! part of the match becomes the token. Label rules capture only the value
//! after the label, which strips the label and its separator.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Family of part-number patterns, listed in default priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// `AB-123`, `ABCD-1234X`
    HyphenatedCode,
    /// `AB123`, `ABCD1234X`
    CompactCode,
    /// `PN: <value>`, case-insensitive
    PnLabel,
    /// `PART:<value>`, case-insensitive
    PartLabel,
}

impl RuleKind {
    /// Get the string representation of the rule kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HyphenatedCode => "hyphenated_code",
            Self::CompactCode => "compact_code",
            Self::PnLabel => "pn_label",
            Self::PartLabel => "part_label",
        }
    }
}

/// Which portion of a regex match is returned as the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// The whole match
    Whole,
    /// A capture group, dropping whatever the pattern matched around it
    Group(usize),
}

/// One recognition rule.
#[derive(Clone)]
pub struct TokenRule {
    /// Pattern family
    pub kind: RuleKind,
    /// Compiled pattern
    pub regex: Regex,
    /// Portion of the match kept as the token
    pub capture: Capture,
}

impl std::fmt::Debug for TokenRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRule")
            .field("kind", &self.kind)
            .field("regex", &self.regex.as_str())
            .field("capture", &self.capture)
            .finish()
    }
}

impl TokenRule {
    /// Return the token from the first match of this rule, if any.
    #[must_use]
    pub fn apply<'t>(&self, text: &'t str) -> Option<&'t str> {
        let captures = self.regex.captures(text)?;
        let matched = match self.capture {
            Capture::Whole => captures.get(0),
            Capture::Group(idx) => captures.get(idx),
        }?;

        let value = matched.as_str().trim();
        (!value.is_empty()).then_some(value)
    }
}

/// Default rules in priority order.
#[must_use]
pub fn default_rules() -> Vec<TokenRule> {
    vec![
        TokenRule {
            kind: RuleKind::HyphenatedCode,
            regex: HYPHENATED_REGEX.clone(),
            capture: Capture::Whole,
        },
        TokenRule {
            kind: RuleKind::CompactCode,
            regex: COMPACT_REGEX.clone(),
            capture: Capture::Whole,
        },
        TokenRule {
            kind: RuleKind::PnLabel,
            regex: PN_LABEL_REGEX.clone(),
            capture: Capture::Group(1),
        },
        TokenRule {
            kind: RuleKind::PartLabel,
            regex: PART_LABEL_REGEX.clone(),
            capture: Capture::Group(1),
        },
    ]
}

// Compiled regex patterns
static HYPHENATED_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z]{2,4}-\d{3,4}[A-Z]?\b").expect("valid hyphenated code regex")
});

static COMPACT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z]{2,4}\d{3,4}[A-Z]?\b").expect("valid compact code regex"));

static PN_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bPN:?\s*([A-Z0-9-]{4,12})").expect("valid PN label regex")
});

static PART_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bPART:?\s*([A-Z0-9-]{4,12})").expect("valid PART label regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(kind: RuleKind) -> TokenRule {
        default_rules()
            .into_iter()
            .find(|r| r.kind == kind)
            .expect("rule present")
    }

    #[test]
    fn test_default_priority_order() {
        let kinds: Vec<_> = default_rules().iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RuleKind::HyphenatedCode,
                RuleKind::CompactCode,
                RuleKind::PnLabel,
                RuleKind::PartLabel,
            ]
        );
    }

    #[test]
    fn test_hyphenated_rule_bounds() {
        let r = rule(RuleKind::HyphenatedCode);
        assert_eq!(r.apply("AB-123"), Some("AB-123"));
        assert_eq!(r.apply("ABCD-1234Z"), Some("ABCD-1234Z"));
        assert_eq!(r.apply("A-123"), None);
        assert_eq!(r.apply("AB-12"), None);
        assert_eq!(r.apply("ab-123"), None);
    }

    #[test]
    fn test_compact_rule_requires_uppercase_prefix() {
        let r = rule(RuleKind::CompactCode);
        assert_eq!(r.apply("code XY9911 here"), Some("XY9911"));
        assert_eq!(r.apply("xy9911"), None);
    }

    #[test]
    fn test_label_rules_capture_value_only() {
        let pn = rule(RuleKind::PnLabel);
        assert_eq!(pn.apply("PN: XY-9911"), Some("XY-9911"));
        assert_eq!(pn.apply("pn:abcd"), Some("abcd"));
        assert_eq!(pn.apply("PN: abc"), None);

        let part = rule(RuleKind::PartLabel);
        assert_eq!(part.apply("PART:XY-9911"), Some("XY-9911"));
        assert_eq!(part.apply("part 000123456789999"), Some("000123456789"));
    }

    #[test]
    fn test_rule_kind_names() {
        assert_eq!(RuleKind::PnLabel.as_str(), "pn_label");
        assert_eq!(RuleKind::HyphenatedCode.as_str(), "hyphenated_code");
    }
}
