//! Financial progress computation

use serde::{Deserialize, Serialize};

use super::config::FinancialConfig;
use super::extract::{extract_current_amount, extract_target_amount, AmountMatch};
use crate::error::Result;

/// A prior progress result for the same goal
///
/// Only the most recent record's percentage is read. Records without one
/// (an update that was never analyzed) count as 0.
pub trait ProgressRecord {
    fn percentage(&self) -> Option<f64>;
}

impl ProgressRecord for f64 {
    fn percentage(&self) -> Option<f64> {
        Some(*self)
    }
}

impl<T: ProgressRecord + ?Sized> ProgressRecord for &T {
    fn percentage(&self) -> Option<f64> {
        (**self).percentage()
    }
}

/// Computed progress for a financial goal
///
/// `percentage` and `delta` are already rounded to whole numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialProgress {
    pub percentage: f64,
    pub delta: f64,
    pub explanation: String,
    pub feedback: String,
}

/// Why the financial path does not apply to an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotApplicableReason {
    NotFinancial,
    NoTargetAmount,
    ZeroTarget,
    NoCurrentAmount,
    MalformedAmount,
}

impl NotApplicableReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFinancial => "not_financial",
            Self::NoTargetAmount => "no_target_amount",
            Self::ZeroTarget => "zero_target",
            Self::NoCurrentAmount => "no_current_amount",
            Self::MalformedAmount => "malformed_amount",
        }
    }
}

impl std::fmt::Display for NotApplicableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a financial computation
#[derive(Debug, Clone, PartialEq)]
pub enum FinancialAssessment {
    Computed(FinancialProgress),
    NotApplicable(NotApplicableReason),
}

impl FinancialAssessment {
    pub fn computed(self) -> Option<FinancialProgress> {
        match self {
            Self::Computed(progress) => Some(progress),
            Self::NotApplicable(_) => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }
}

/// Computes progress from the amounts in goal and journal text
#[derive(Debug, Clone, Default)]
pub struct FinancialProgressCalculator {
    config: FinancialConfig,
}

impl FinancialProgressCalculator {
    pub fn new(config: FinancialConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FinancialConfig {
        &self.config
    }

    /// Compute progress for one journal entry
    ///
    /// Never fails: anything that prevents a computation is reported as
    /// `NotApplicable` so the caller can use another estimator.
    pub fn compute<R: ProgressRecord>(
        &self,
        goal_text: &str,
        journal_text: &str,
        history: &[R],
    ) -> FinancialAssessment {
        if !self.config.is_financial(goal_text) {
            return FinancialAssessment::NotApplicable(NotApplicableReason::NotFinancial);
        }

        match self.try_compute(goal_text, journal_text, history) {
            Ok(assessment) => assessment,
            Err(e) => {
                tracing::debug!(error = %e, "Financial amounts unreadable, skipping");
                FinancialAssessment::NotApplicable(NotApplicableReason::MalformedAmount)
            }
        }
    }

    fn try_compute<R: ProgressRecord>(
        &self,
        goal_text: &str,
        journal_text: &str,
        history: &[R],
    ) -> Result<FinancialAssessment> {
        let target = match extract_target_amount(goal_text)? {
            AmountMatch::Found(amount) if amount > 0.0 => amount,
            AmountMatch::Found(_) => {
                return Ok(FinancialAssessment::NotApplicable(
                    NotApplicableReason::ZeroTarget,
                ))
            }
            AmountMatch::NotFound => {
                return Ok(FinancialAssessment::NotApplicable(
                    NotApplicableReason::NoTargetAmount,
                ))
            }
        };

        let Some(current) = extract_current_amount(journal_text)?.amount() else {
            return Ok(FinancialAssessment::NotApplicable(
                NotApplicableReason::NoCurrentAmount,
            ));
        };

        let percentage = (current / target * 100.0).clamp(0.0, 100.0);
        let previous = history
            .last()
            .and_then(|record| record.percentage())
            .unwrap_or(0.0);
        let delta = (percentage - previous).max(0.0);

        tracing::debug!(current, target, percentage, previous, "Financial progress computed");

        Ok(FinancialAssessment::Computed(FinancialProgress {
            percentage: percentage.round(),
            delta: delta.round(),
            explanation: format!(
                "Current: ${}, Target: ${}",
                super::format_amount(current),
                super::format_amount(target)
            ),
            feedback: self
                .config
                .select_feedback(current, target, percentage, journal_text),
        }))
    }
}

/// Compute with the built-in keyword tables and thresholds
pub fn compute_financial_progress<R: ProgressRecord>(
    goal_text: &str,
    journal_text: &str,
    history: &[R],
) -> FinancialAssessment {
    FinancialProgressCalculator::default().compute(goal_text, journal_text, history)
}
