//! Domain models for Stride

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::financial::{FinancialProgress, ProgressRecord};

/// A user-defined goal tracked over time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Where the user started (e.g., "1302 rating in ultra ball 4")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_progress: Option<String>,
    /// Additional context (e.g., "Reach $3,000", "1450 is the next rank")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// 0-100
    #[serde(default)]
    pub overall_progress: f64,
    /// Older records have no status; they are treated as in progress
    #[serde(default)]
    pub status: GoalStatus,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Concatenated title, description and context, scanned for financial
    /// keywords and the target amount
    pub fn goal_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.description.as_deref().unwrap_or(""),
            self.context.as_deref().unwrap_or("")
        )
    }

    /// Journal entries and coaching are only taken for goals in progress
    pub fn ensure_in_progress(&self) -> Result<()> {
        if self.status == GoalStatus::InProgress {
            Ok(())
        } else {
            Err(Error::InvalidData(format!(
                "Goal \"{}\" is {}",
                self.title, self.status
            )))
        }
    }
}

impl ProgressRecord for Goal {
    fn percentage(&self) -> Option<f64> {
        Some(self.overall_progress)
    }
}

/// Fields supplied when creating a goal
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub title: String,
    pub description: Option<String>,
    pub initial_progress: Option<String>,
    pub context: Option<String>,
}

/// Goal lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GoalStatus {
    #[default]
    InProgress,
    Paused,
    Completed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in-progress",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "in-progress" | "active" => Ok(Self::InProgress),
            "paused" => Ok(Self::Paused),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(format!("Unknown goal status: {}", s)),
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A journal entry submitted for a goal, with the analysis it received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub goal_id: String,
    pub journal_entry: String,
    #[serde(default)]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_response: Option<ProgressAnalysis>,
}

impl ProgressRecord for ProgressUpdate {
    fn percentage(&self) -> Option<f64> {
        self.llm_response.as_ref().map(|r| r.overall_progress)
    }
}

/// Progress estimate for one journal entry
///
/// Field names follow the JSON shape the model is asked to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressAnalysis {
    pub overall_progress: f64,
    pub progress_increase: f64,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub feedback: String,
}

impl ProgressAnalysis {
    /// Clamp overall progress to [0, 100] and floor the increase at 0
    pub fn normalized(mut self) -> Self {
        self.overall_progress = validate_progress(self.overall_progress);
        self.progress_increase = if self.progress_increase.is_finite() {
            self.progress_increase.max(0.0)
        } else {
            0.0
        };
        self
    }
}

impl ProgressRecord for ProgressAnalysis {
    fn percentage(&self) -> Option<f64> {
        Some(self.overall_progress)
    }
}

impl From<FinancialProgress> for ProgressAnalysis {
    fn from(progress: FinancialProgress) -> Self {
        Self {
            overall_progress: progress.percentage,
            progress_increase: progress.delta,
            reasoning: progress.explanation,
            feedback: progress.feedback,
        }
    }
}

/// Milestone priority
///
/// Deserializes leniently: models answer "High" as often as "high", and an
/// unrecognized value is treated as medium rather than rejecting the advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub timeline: String,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub impact: String,
}

/// Coaching advice for a goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachingAdvice {
    pub milestones: Vec<Milestone>,
    pub habits: Vec<Habit>,
    pub advice: String,
}

/// Everything the local store persists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub updates: Vec<ProgressUpdate>,
}

/// Clamp a progress value to [0, 100]; NaN becomes 0
pub fn validate_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        return 0.0;
    }
    progress.clamp(0.0, 100.0)
}

/// Format a progress value for display ("83%")
pub fn format_progress(progress: f64) -> String {
    format!("{}%", progress.round())
}
