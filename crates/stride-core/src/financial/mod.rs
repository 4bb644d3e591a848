//! Deterministic progress estimation for financial goals
//!
//! When a goal talks about money ("Grow bankroll to $3,000") progress can be
//! computed from the numbers in the goal and the journal entry instead of
//! asking a language model:
//!
//! - `classifier`: does the goal text use financial vocabulary?
//! - `extract`: ordered amount patterns for target and current amounts
//! - `calculator`: percentage, delta against history, explanation
//! - `feedback`: templated feedback by trend and threshold
//!
//! Everything here is pure and synchronous. The calculator never fails; any
//! input it cannot handle yields `FinancialAssessment::NotApplicable` so the
//! caller can fall back to model-based estimation.

mod calculator;
mod classifier;
mod config;
pub mod extract;
mod feedback;

pub use calculator::{
    compute_financial_progress, FinancialAssessment, FinancialProgress,
    FinancialProgressCalculator, NotApplicableReason, ProgressRecord,
};
pub use classifier::is_financial;
pub use config::{FeedbackThresholds, FinancialConfig, FINANCIAL_KEYWORDS, LOSS_KEYWORDS};
pub use extract::{
    extract_amount, extract_current_amount, extract_target_amount, AmountMatch, AmountPattern,
};
pub use feedback::{format_amount, select_feedback, FeedbackTier};
