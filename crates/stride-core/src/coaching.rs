//! Coaching advice for a goal

use crate::ai::{AIBackend, AIClient};
use crate::error::{Error, Result};
use crate::models::{CoachingAdvice, Goal, ProgressUpdate};

/// Ask the backend for milestones, habits and advice
///
/// A blank question is treated as no question. Fails when the goal is not
/// in progress, when no backend is configured, or when the call itself
/// fails; an unparseable reply still yields default advice.
pub async fn coach(
    ai: Option<&AIClient>,
    goal: &Goal,
    history: &[ProgressUpdate],
    question: Option<&str>,
) -> Result<CoachingAdvice> {
    goal.ensure_in_progress()?;
    let ai = ai.ok_or(Error::AiUnavailable)?;
    let question = question.map(str::trim).filter(|q| !q.is_empty());

    tracing::info!(
        goal = %goal.id,
        model = ai.model(),
        has_question = question.is_some(),
        "Requesting coaching advice"
    );

    let advice = ai.coach(goal, history, question).await?;
    tracing::debug!(
        milestones = advice.milestones.len(),
        habits = advice.habits.len(),
        "Coaching advice received"
    );
    Ok(advice)
}
