//! Prompt context assembly
//!
//! Gathers what a model call needs to know about a goal (its fields, current
//! progress, recent journal entries) and turns it into template variables
//! for the prompt library.

use std::collections::HashMap;

use crate::models::{Goal, ProgressUpdate};

/// Characters of the previous journal entry quoted in progress prompts
const PREVIOUS_ENTRY_CHARS: usize = 50;

/// Journal entries quoted in coaching prompts
const RECENT_ENTRIES: usize = 2;

/// Assembled context for a prompt
#[derive(Debug, Clone, PartialEq)]
pub struct PromptContext {
    vars: HashMap<&'static str, String>,
}

impl PromptContext {
    /// Context for estimating progress from a new journal entry
    ///
    /// Only the most recent update is quoted, truncated to its first 50
    /// characters, alongside the percentage it was given.
    pub fn for_progress(goal: &Goal, journal_entry: &str, history: &[ProgressUpdate]) -> Self {
        let mut vars = HashMap::new();
        vars.insert("title", goal.title.clone());
        vars.insert("current_progress", goal.overall_progress.to_string());
        vars.insert("journal_entry", journal_entry.to_string());

        if let Some(last) = history.last() {
            let excerpt: String = last.journal_entry.chars().take(PREVIOUS_ENTRY_CHARS).collect();
            let percentage = last
                .llm_response
                .as_ref()
                .map(|r| r.overall_progress)
                .unwrap_or(0.0);
            vars.insert("previous", format!("{} ({}%)", excerpt, percentage));
        }

        Self { vars }
    }

    /// Context for coaching advice, with an optional user question
    pub fn for_coaching(goal: &Goal, history: &[ProgressUpdate], question: Option<&str>) -> Self {
        let mut vars = HashMap::new();
        vars.insert("title", goal.title.clone());
        vars.insert(
            "description",
            or_default(goal.description.as_deref(), "No description"),
        );
        vars.insert("current_progress", goal.overall_progress.to_string());
        vars.insert(
            "initial_progress",
            or_default(goal.initial_progress.as_deref(), "Not specified"),
        );
        vars.insert(
            "context",
            or_default(goal.context.as_deref(), "No additional context"),
        );

        let recent = if history.is_empty() {
            "No previous progress updates".to_string()
        } else {
            let start = history.len().saturating_sub(RECENT_ENTRIES);
            let entries: Vec<&str> = history[start..]
                .iter()
                .map(|u| u.journal_entry.as_str())
                .collect();
            format!("Recent progress: {}", entries.join("; "))
        };
        vars.insert("recent_progress", recent);

        if let Some(question) = question.map(str::trim).filter(|q| !q.is_empty()) {
            vars.insert("question", question.to_string());
        }

        Self { vars }
    }

    /// Template variables ready for `Prompt::render_user`
    pub fn to_template_vars(&self) -> &HashMap<&'static str, String> {
        &self.vars
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

fn or_default(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalStatus, ProgressAnalysis};
    use crate::prompts::{PromptId, PromptLibrary};
    use chrono::Utc;

    fn goal() -> Goal {
        Goal {
            id: "g1".into(),
            title: "Run a marathon".into(),
            description: None,
            initial_progress: Some("Can run 5k".into()),
            context: None,
            overall_progress: 40.0,
            status: GoalStatus::InProgress,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn update(entry: &str, progress: Option<f64>) -> ProgressUpdate {
        ProgressUpdate {
            id: uuid::Uuid::new_v4().to_string(),
            goal_id: "g1".into(),
            journal_entry: entry.into(),
            timestamp: Utc::now(),
            llm_response: progress.map(|p| ProgressAnalysis {
                overall_progress: p,
                progress_increase: 0.0,
                reasoning: String::new(),
                feedback: String::new(),
            }),
        }
    }

    #[test]
    fn test_progress_context_without_history() {
        let ctx = PromptContext::for_progress(&goal(), "Ran 10 miles", &[]);
        assert_eq!(ctx.get("title"), Some("Run a marathon"));
        assert_eq!(ctx.get("current_progress"), Some("40"));
        assert_eq!(ctx.get("previous"), None);
    }

    #[test]
    fn test_progress_context_quotes_last_entry_truncated() {
        let long_entry = "a".repeat(80);
        let history = vec![update("first", Some(10.0)), update(&long_entry, Some(35.5))];
        let ctx = PromptContext::for_progress(&goal(), "Ran 10 miles", &history);
        assert_eq!(ctx.get("previous"), Some(format!("{} (35.5%)", "a".repeat(50)).as_str()));

        let unanalyzed = vec![update("rest day", None)];
        let ctx = PromptContext::for_progress(&goal(), "Ran 10 miles", &unanalyzed);
        assert_eq!(ctx.get("previous"), Some("rest day (0%)"));
    }

    #[test]
    fn test_coaching_context_defaults() {
        let ctx = PromptContext::for_coaching(&goal(), &[], None);
        assert_eq!(ctx.get("description"), Some("No description"));
        assert_eq!(ctx.get("initial_progress"), Some("Can run 5k"));
        assert_eq!(ctx.get("context"), Some("No additional context"));
        assert_eq!(ctx.get("recent_progress"), Some("No previous progress updates"));
        assert_eq!(ctx.get("question"), None);
    }

    #[test]
    fn test_coaching_context_uses_last_two_entries() {
        let history = vec![update("one", None), update("two", None), update("three", None)];
        let ctx = PromptContext::for_coaching(&goal(), &history, Some("  How do I taper?  "));
        assert_eq!(ctx.get("recent_progress"), Some("Recent progress: two; three"));
        assert_eq!(ctx.get("question"), Some("How do I taper?"));

        let ctx = PromptContext::for_coaching(&goal(), &history, Some("   "));
        assert_eq!(ctx.get("question"), None);
    }

    #[test]
    fn test_rendered_progress_prompt() {
        let mut lib = PromptLibrary::embedded_only();
        let prompt = lib.get(PromptId::AnalyzeProgress).unwrap();

        let ctx = PromptContext::for_progress(&goal(), "Ran 10 miles", &[update("Ran 8", Some(30.0))]);
        let rendered = prompt.render_user(ctx.to_template_vars());
        assert_eq!(
            rendered,
            "Goal: Run a marathon\nCurrent: 40%\nPrevious: Ran 8 (30%)\nEntry: \"Ran 10 miles\"\nAnalyze progress change."
        );

        let ctx = PromptContext::for_progress(&goal(), "Ran 10 miles", &[]);
        let rendered = prompt.render_user(ctx.to_template_vars());
        assert_eq!(
            rendered,
            "Goal: Run a marathon\nCurrent: 40%\nEntry: \"Ran 10 miles\"\nAnalyze progress change."
        );
    }

    #[test]
    fn test_rendered_coaching_prompt_closing_line() {
        let mut lib = PromptLibrary::embedded_only();
        let prompt = lib.get(PromptId::CoachGoal).unwrap();

        let ctx = PromptContext::for_coaching(&goal(), &[], Some("How do I taper?"));
        let rendered = prompt.render_user(ctx.to_template_vars());
        assert!(rendered.contains("User Question: How do I taper?"));
        assert!(rendered.ends_with("Provide specific advice addressing their question."));

        let ctx = PromptContext::for_coaching(&goal(), &[], None);
        let rendered = prompt.render_user(ctx.to_template_vars());
        assert!(!rendered.contains("User Question"));
        assert!(rendered.ends_with("Provide strategic milestones and habits to help achieve this goal."));
        assert!(rendered.contains("Description: No description"));
    }
}
