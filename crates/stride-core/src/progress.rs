//! Progress estimation for a journal entry
//!
//! Estimators are tried in order:
//! 1. the deterministic financial calculator, when the goal is about money
//!    and both amounts can be read;
//! 2. the AI backend, called once;
//! 3. a static fallback that keeps the goal where it was.
//!
//! A model estimate is held to the calculator's rules: overall clamped to
//! [0, 100], increase measured against the last recorded percentage.
//!
//! `analyze` never fails. The outcome says which estimator produced it.

use serde::Serialize;

use crate::ai::{AIBackend, AIClient};
use crate::error::Error;
use crate::financial::{
    FinancialAssessment, FinancialConfig, FinancialProgressCalculator, ProgressRecord,
};
use crate::models::{Goal, ProgressAnalysis, ProgressUpdate};

/// Which estimator produced an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    /// Computed from amounts in the goal and journal text
    Financial,
    /// Estimated by the model
    Model,
    /// The model answered but not with JSON
    ParseFallback,
    /// No backend configured, or the call failed
    Unavailable,
}

impl AnalysisSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Financial => "financial",
            Self::Model => "model",
            Self::ParseFallback => "parse_fallback",
            Self::Unavailable => "unavailable",
        }
    }
}

impl std::fmt::Display for AnalysisSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of analyzing one journal entry
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressOutcome {
    pub analysis: ProgressAnalysis,
    pub source: AnalysisSource,
    /// Why the model path was not used, when it failed
    pub error: Option<String>,
}

impl ProgressOutcome {
    /// Whether the analysis reflects the entry (anything but the static
    /// unavailable fallback)
    pub fn is_available(&self) -> bool {
        self.source != AnalysisSource::Unavailable
    }
}

/// Static analysis when the model reply could not be parsed
pub fn parse_fallback(goal: &Goal) -> ProgressAnalysis {
    ProgressAnalysis {
        overall_progress: goal.overall_progress,
        progress_increase: 0.0,
        reasoning: "Unable to analyze progress due to parsing error".to_string(),
        feedback: "Your progress has been recorded. Please try again for AI analysis.".to_string(),
    }
    .normalized()
}

/// Static analysis when no estimate is possible
pub fn unavailable_fallback(goal: &Goal) -> ProgressAnalysis {
    ProgressAnalysis {
        overall_progress: goal.overall_progress,
        progress_increase: 0.0,
        reasoning: "Unable to analyze progress due to technical issues".to_string(),
        feedback: "Your progress has been recorded. AI analysis is temporarily unavailable."
            .to_string(),
    }
    .normalized()
}

/// Clamp a model estimate and recompute its increase from the last recorded
/// percentage (0 when nothing was recorded)
pub fn rebase_on_history(
    analysis: ProgressAnalysis,
    history: &[ProgressUpdate],
) -> ProgressAnalysis {
    let previous = history
        .last()
        .and_then(ProgressRecord::percentage)
        .unwrap_or(0.0);
    let mut analysis = analysis.normalized();
    analysis.progress_increase = (analysis.overall_progress - previous).max(0.0);
    analysis
}

/// Runs the estimators in order for each journal entry
#[derive(Clone)]
pub struct ProgressAnalyzer {
    calculator: FinancialProgressCalculator,
    ai: Option<AIClient>,
}

impl ProgressAnalyzer {
    pub fn new(ai: Option<AIClient>, financial: FinancialConfig) -> Self {
        Self {
            calculator: FinancialProgressCalculator::new(financial),
            ai,
        }
    }

    pub fn ai(&self) -> Option<&AIClient> {
        self.ai.as_ref()
    }

    pub fn calculator(&self) -> &FinancialProgressCalculator {
        &self.calculator
    }

    /// Analyze a journal entry for `goal` given its earlier updates
    pub async fn analyze(
        &self,
        goal: &Goal,
        journal_entry: &str,
        history: &[ProgressUpdate],
    ) -> ProgressOutcome {
        match self
            .calculator
            .compute(&goal.goal_text(), journal_entry, history)
        {
            FinancialAssessment::Computed(progress) => {
                tracing::info!(
                    goal = %goal.id,
                    progress = progress.percentage,
                    "Financial progress computed"
                );
                return ProgressOutcome {
                    analysis: progress.into(),
                    source: AnalysisSource::Financial,
                    error: None,
                };
            }
            FinancialAssessment::NotApplicable(reason) => {
                tracing::debug!(goal = %goal.id, %reason, "Financial estimate not applicable");
            }
        }

        let Some(ref ai) = self.ai else {
            tracing::warn!(goal = %goal.id, "No AI backend configured, using fallback analysis");
            return ProgressOutcome {
                analysis: unavailable_fallback(goal),
                source: AnalysisSource::Unavailable,
                error: Some(Error::AiUnavailable.to_string()),
            };
        };

        match ai.analyze_progress(goal, journal_entry, history).await {
            Ok(analysis) => {
                let analysis = rebase_on_history(analysis, history);
                tracing::info!(
                    goal = %goal.id,
                    model = ai.model(),
                    progress = analysis.overall_progress,
                    "Model progress estimated"
                );
                ProgressOutcome {
                    analysis,
                    source: AnalysisSource::Model,
                    error: None,
                }
            }
            Err(e @ Error::MalformedResponse(_)) => {
                tracing::warn!(goal = %goal.id, error = %e, "Model reply was not JSON");
                ProgressOutcome {
                    analysis: parse_fallback(goal),
                    source: AnalysisSource::ParseFallback,
                    error: Some(e.to_string()),
                }
            }
            Err(e) => {
                tracing::warn!(goal = %goal.id, error = %e, "Model progress analysis failed");
                ProgressOutcome {
                    analysis: unavailable_fallback(goal),
                    source: AnalysisSource::Unavailable,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
