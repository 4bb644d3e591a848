//! Stride Core Library
//!
//! Shared functionality for the Stride goal tracker:
//! - Goal and journal update models
//! - Local JSON goal store
//! - Deterministic progress estimation for financial goals
//! - Pluggable AI backends (OpenAI-compatible, mock)
//! - Progress analysis with ordered fallbacks
//! - Coaching advice (milestones, habits, answers to questions)
//! - Prompt library for customizable AI prompts
//! - Two-layer settings (embedded defaults, user overrides)

pub mod ai;
pub mod coaching;
pub mod context;
pub mod error;
pub mod financial;
pub mod models;
pub mod progress;
pub mod prompts;
pub mod settings;
pub mod storage;

/// Test utilities including a mock OpenAI-compatible server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIBackend, AIClient, MockBackend, OpenAICompatibleBackend};
pub use coaching::coach;
pub use context::PromptContext;
pub use error::{Error, Result};
pub use financial::{
    compute_financial_progress, is_financial, FinancialAssessment, FinancialConfig,
    FinancialProgress, FinancialProgressCalculator,
};
pub use models::{
    format_progress, validate_progress, AppState, CoachingAdvice, Goal, GoalStatus, Habit,
    Milestone, NewGoal, Priority, ProgressAnalysis, ProgressUpdate,
};
pub use progress::{AnalysisSource, ProgressAnalyzer, ProgressOutcome};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use settings::{AiSettings, Settings};
pub use storage::{GoalStore, RecordedUpdate};
