//! Mock backend for testing
//!
//! Returns predictable responses without a model server. Can also replay a
//! raw model reply through the real parsers, or fail every call.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{CoachingAdvice, Goal, Habit, Milestone, Priority, ProgressAnalysis, ProgressUpdate};

use super::parsing::{coaching_from_response, parse_progress_analysis};
use super::AIBackend;

/// Mock AI backend for testing
#[derive(Clone, Debug)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Whether model calls should fail
    pub failing: bool,
    progress_response: Option<String>,
    coaching_response: Option<String>,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            failing: false,
            progress_response: None,
            coaching_response: None,
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Every model call returns an error
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new()
        }
    }

    /// Reply to progress requests with this raw model text
    pub fn with_progress_response(mut self, raw: impl Into<String>) -> Self {
        self.progress_response = Some(raw.into());
        self
    }

    /// Reply to coaching requests with this raw model text
    pub fn with_coaching_response(mut self, raw: impl Into<String>) -> Self {
        self.coaching_response = Some(raw.into());
        self
    }

    fn check_failing(&self) -> Result<()> {
        if self.failing {
            Err(Error::InvalidData("Mock backend failure".into()))
        } else {
            Ok(())
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn analyze_progress(
        &self,
        goal: &Goal,
        journal_entry: &str,
        _history: &[ProgressUpdate],
    ) -> Result<ProgressAnalysis> {
        self.check_failing()?;

        if let Some(ref raw) = self.progress_response {
            return parse_progress_analysis(raw);
        }

        // A small, conservative step forward
        let overall = (goal.overall_progress + 5.0).min(100.0);
        Ok(ProgressAnalysis {
            overall_progress: overall,
            progress_increase: overall - goal.overall_progress,
            reasoning: format!(
                "Mock analysis of a {}-word entry",
                journal_entry.split_whitespace().count()
            ),
            feedback: "Keep going!".to_string(),
        })
    }

    async fn coach(
        &self,
        goal: &Goal,
        _history: &[ProgressUpdate],
        question: Option<&str>,
    ) -> Result<CoachingAdvice> {
        self.check_failing()?;

        if let Some(ref raw) = self.coaching_response {
            return Ok(coaching_from_response(raw));
        }

        let advice = match question {
            Some(q) => format!("Mock answer to: {}", q),
            None => format!("Keep working on {}", goal.title),
        };
        Ok(CoachingAdvice {
            milestones: vec![Milestone {
                title: format!("Next step for {}", goal.title),
                description: "Pick one concrete action".to_string(),
                timeline: "1 week".to_string(),
                priority: Priority::High,
            }],
            habits: vec![Habit {
                name: "Daily check-in".to_string(),
                description: "Write a short journal entry".to_string(),
                frequency: "daily".to_string(),
                impact: "medium".to_string(),
            }],
            advice,
        })
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GoalStatus;
    use chrono::Utc;

    fn goal(progress: f64) -> Goal {
        Goal {
            id: "g1".into(),
            title: "Learn Spanish".into(),
            description: None,
            initial_progress: None,
            context: None,
            overall_progress: progress,
            status: GoalStatus::InProgress,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_mock_analyze_progress() {
        let mock = MockBackend::new();
        let analysis = mock
            .analyze_progress(&goal(40.0), "Practiced verbs", &[])
            .await
            .unwrap();
        assert_eq!(analysis.overall_progress, 45.0);
        assert_eq!(analysis.progress_increase, 5.0);

        let capped = mock.analyze_progress(&goal(98.0), "Done", &[]).await.unwrap();
        assert_eq!(capped.overall_progress, 100.0);
        assert_eq!(capped.progress_increase, 2.0);
    }

    #[tokio::test]
    async fn test_mock_replays_raw_response() {
        let mock = MockBackend::new().with_progress_response("not json");
        let result = mock.analyze_progress(&goal(10.0), "x", &[]).await;
        assert!(matches!(result, Err(Error::MalformedResponse(_))));

        let mock = MockBackend::new().with_coaching_response("no structure here");
        let advice = mock.coach(&goal(10.0), &[], None).await.unwrap();
        assert_eq!(advice.milestones.len(), 3);
    }

    #[tokio::test]
    async fn test_mock_coach_answers_question() {
        let mock = MockBackend::new();
        let advice = mock
            .coach(&goal(10.0), &[], Some("How often?"))
            .await
            .unwrap();
        assert_eq!(advice.advice, "Mock answer to: How often?");
    }

    #[tokio::test]
    async fn test_mock_failing() {
        let mock = MockBackend::failing();
        assert!(mock.analyze_progress(&goal(10.0), "x", &[]).await.is_err());
        assert!(mock.coach(&goal(10.0), &[], None).await.is_err());
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        assert!(MockBackend::new().health_check().await);
        assert!(!MockBackend::unhealthy().health_check().await);
    }
}
