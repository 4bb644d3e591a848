//! Amount extraction from free text
//!
//! Each `AmountPattern` is one way of spotting a dollar amount. Patterns are
//! tried in a fixed order and the first one that matches wins; explicit unit
//! markers (k suffix, `$`, "dollars", cue words) come before the bare-number
//! fallback so dates, ratings and counts are not mistaken for money.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

/// Result of scanning text for an amount
///
/// `Found(0.0)` is a real amount; `NotFound` means nothing matched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmountMatch {
    Found(f64),
    NotFound,
}

impl AmountMatch {
    pub fn amount(self) -> Option<f64> {
        match self {
            Self::Found(amount) => Some(amount),
            Self::NotFound => None,
        }
    }

    pub fn is_found(self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// A named amount pattern
///
/// The regex must have exactly one capture group holding the numeric text.
pub struct AmountPattern {
    pub name: &'static str,
    regex: Regex,
    /// Multiply by 1000 when the parsed value is below 1000 ("3k")
    thousands_suffix: bool,
}

impl AmountPattern {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("valid amount pattern"),
            thousands_suffix: false,
        }
    }

    fn thousands(name: &'static str, pattern: &str) -> Self {
        Self {
            thousands_suffix: true,
            ..Self::new(name, pattern)
        }
    }

    /// The numeric text of the first match, if any
    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Parse a captured number and apply this pattern's scaling
    fn amount(&self, raw: &str) -> Result<f64> {
        let amount = parse_amount(raw)?;
        if self.thousands_suffix && amount < 1000.0 {
            Ok(amount * 1000.0)
        } else {
            Ok(amount)
        }
    }
}

impl std::fmt::Debug for AmountPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmountPattern")
            .field("name", &self.name)
            .field("regex", &self.regex.as_str())
            .field("thousands_suffix", &self.thousands_suffix)
            .finish()
    }
}

/// Digits with optional thousands separators and decimals: 3000, 3,000, 2500.50
const NUMBER: &str = r"([0-9]+(?:,[0-9]{3})*(?:\.[0-9]+)?)";

/// Patterns for the target amount in goal text, highest confidence first
pub static TARGET_PATTERNS: Lazy<Vec<AmountPattern>> = Lazy::new(|| {
    vec![
        AmountPattern::thousands("k_suffix", r"(?i)([0-9]+(?:\.[0-9]+)?)\s*k"),
        AmountPattern::new("dollar_prefix", &format!(r"\${}", NUMBER)),
        AmountPattern::new("dollars_word", &format!(r"(?i){}\s*dollars?", NUMBER)),
        AmountPattern::new("dollar_suffix", &format!(r"{}\s*\$", NUMBER)),
        AmountPattern::new("bare_number", &format!(r"{}(?:\s|$)", NUMBER)),
    ]
});

/// Patterns for the current amount in a journal entry, highest confidence first
pub static CURRENT_PATTERNS: Lazy<Vec<AmountPattern>> = Lazy::new(|| {
    vec![
        AmountPattern::new(
            "cue_word",
            &format!(
                r"(?i)(?:current|now|at|is|bankroll|balance|total|amount)\s*:?\s*\$?{}",
                NUMBER
            ),
        ),
        AmountPattern::new("dollar_prefix", &format!(r"\${}", NUMBER)),
        AmountPattern::new("dollars_word", &format!(r"(?i){}\s*dollars?", NUMBER)),
        AmountPattern::new("dollar_suffix", &format!(r"{}\s*\$", NUMBER)),
    ]
});

/// Try `patterns` in order and return the first match's amount
///
/// Only the first match of the first matching pattern is used. Fails only
/// when the matched text cannot be read as a finite number.
pub fn extract_amount(text: &str, patterns: &[AmountPattern]) -> Result<AmountMatch> {
    for pattern in patterns {
        if let Some(raw) = pattern.capture(text) {
            let amount = pattern.amount(raw)?;
            tracing::trace!(pattern = pattern.name, raw, amount, "Amount matched");
            return Ok(AmountMatch::Found(amount));
        }
    }
    Ok(AmountMatch::NotFound)
}

/// Target amount from a goal's text ("Reach $3,000", "Save 3k")
pub fn extract_target_amount(goal_text: &str) -> Result<AmountMatch> {
    extract_amount(goal_text, &TARGET_PATTERNS)
}

/// Current amount from a journal entry ("Current bankroll: $2,500")
pub fn extract_current_amount(journal_text: &str) -> Result<AmountMatch> {
    extract_amount(journal_text, &CURRENT_PATTERNS)
}

/// Parse "3,000.50" into 3000.5
pub fn parse_amount(raw: &str) -> Result<f64> {
    let cleaned = raw.replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(Error::MalformedAmount(raw.to_string())),
    }
}
