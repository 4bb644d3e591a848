//! Feedback templates for financial goals

use super::config::FinancialConfig;

/// Which feedback template applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTier {
    /// The journal reports a loss; takes priority over every percentage tier
    Setback,
    Complete,
    AlmostThere,
    GoodProgress,
    StayConsistent,
}

impl FinancialConfig {
    /// Pick the template for this entry
    pub fn feedback_tier(&self, percentage: f64, journal_text: &str) -> FeedbackTier {
        let thresholds = &self.thresholds;
        if self.reports_loss(journal_text) {
            FeedbackTier::Setback
        } else if percentage >= thresholds.complete {
            FeedbackTier::Complete
        } else if percentage >= thresholds.almost_there {
            FeedbackTier::AlmostThere
        } else if percentage >= thresholds.good_progress {
            FeedbackTier::GoodProgress
        } else {
            FeedbackTier::StayConsistent
        }
    }

    /// Render feedback for the given amounts and (unrounded) percentage
    pub fn select_feedback(
        &self,
        current: f64,
        target: f64,
        percentage: f64,
        journal_text: &str,
    ) -> String {
        let current = format_amount(current);
        let target = format_amount(target);
        let pct = percentage.round();

        match self.feedback_tier(percentage, journal_text) {
            FeedbackTier::Setback => format!(
                "Current bankroll: ${current}. You're {pct}% to your ${target} goal. Stay disciplined and stick to your strategy."
            ),
            FeedbackTier::Complete => format!(
                "🎉 Congratulations! You've reached your ${target} goal! Current bankroll: ${current}."
            ),
            FeedbackTier::AlmostThere => format!(
                "Great progress! You're {pct}% to your ${target} goal. Current bankroll: ${current}. You're almost there!"
            ),
            FeedbackTier::GoodProgress => format!(
                "Good progress! You're {pct}% to your ${target} goal. Current bankroll: ${current}. Keep it up!"
            ),
            FeedbackTier::StayConsistent => format!(
                "Current bankroll: ${current}. You're {pct}% to your ${target} goal. Stay consistent and focused."
            ),
        }
    }
}

/// Feedback using the built-in tables
pub fn select_feedback(current: f64, target: f64, percentage: f64, journal_text: &str) -> String {
    FinancialConfig::default().select_feedback(current, target, percentage, journal_text)
}

/// Format an amount the way en-US number formatting does: thousands
/// separators and at most three fraction digits ("2,500", "1,234.56")
pub fn format_amount(amount: f64) -> String {
    let formatted = format!("{:.3}", amount.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((&formatted, ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && !formatted.trim_matches(|c| c == '0' || c == '.').is_empty() {
        "-"
    } else {
        ""
    };

    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}
