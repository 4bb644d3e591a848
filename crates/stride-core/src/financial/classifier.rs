//! Financial-goal classification

use super::config::FINANCIAL_KEYWORDS;

/// Whether a goal's text uses financial vocabulary
///
/// Plain substring containment over the lower-cased text, so "refund" counts
/// as "fund" and "$" anywhere counts. Uses the built-in keyword table; see
/// `FinancialConfig::is_financial` for a configured table.
pub fn is_financial(goal_text: &str) -> bool {
    let text = goal_text.to_lowercase();
    FINANCIAL_KEYWORDS.iter().any(|k| text.contains(k))
}
