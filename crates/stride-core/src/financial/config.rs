//! Tunable tables for the financial path
//!
//! The built-in values are the defaults; the settings file may replace them.

use serde::Deserialize;

/// Vocabulary that marks a goal as financial (plain substring match on the
/// lower-cased goal text)
pub const FINANCIAL_KEYWORDS: &[&str] = &[
    "bankroll",
    "savings",
    "money",
    "dollar",
    "$",
    "budget",
    "income",
    "revenue",
    "profit",
    "loss",
    "investment",
    "portfolio",
    "cash",
    "fund",
    "capital",
    "make money",
    "financial",
    "wealth",
    "net worth",
];

/// Journal vocabulary that selects the discipline feedback template
pub const LOSS_KEYWORDS: &[&str] = &["lost", "down", "decreased"];

/// Percentage tiers for feedback selection
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedbackThresholds {
    pub complete: f64,
    pub almost_there: f64,
    pub good_progress: f64,
}

impl Default for FeedbackThresholds {
    fn default() -> Self {
        Self {
            complete: 100.0,
            almost_there: 80.0,
            good_progress: 50.0,
        }
    }
}

/// Keyword tables and thresholds used by the classifier and feedback selector
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FinancialConfig {
    pub keywords: Vec<String>,
    pub loss_keywords: Vec<String>,
    pub thresholds: FeedbackThresholds,
}

impl Default for FinancialConfig {
    fn default() -> Self {
        Self {
            keywords: FINANCIAL_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            loss_keywords: LOSS_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            thresholds: FeedbackThresholds::default(),
        }
    }
}

impl FinancialConfig {
    /// Whether the goal text contains any financial keyword
    pub fn is_financial(&self, goal_text: &str) -> bool {
        contains_any(goal_text, &self.keywords)
    }

    /// Whether the journal text reports a loss or decline
    pub fn reports_loss(&self, journal_text: &str) -> bool {
        contains_any(journal_text, &self.loss_keywords)
    }
}

/// Case-insensitive substring containment; keywords are lower-cased too so
/// overrides may be written in any case
fn contains_any(text: &str, keywords: &[String]) -> bool {
    let text = text.to_lowercase();
    keywords
        .iter()
        .filter(|k| !k.is_empty())
        .any(|k| text.contains(&k.to_lowercase()))
}
