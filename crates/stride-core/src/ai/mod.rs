//! Pluggable AI backend abstraction
//!
//! # Architecture
//!
//! - `AIBackend` trait: progress estimation and coaching
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let settings = Settings::load()?;
//! if let Some(ai) = AIClient::from_env(&settings.ai) {
//!     let advice = ai.coach(&goal, &history, Some("How do I stay motivated?")).await?;
//!     println!("{}", advice.advice);
//! }
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (openai, mock). Default: openai
//! - see `openai_compatible` for host and key variables
//!
//! Every call is a single attempt; callers decide what to fall back to.

mod mock;
mod openai_compatible;
pub mod parsing;

pub use mock::MockBackend;
pub use openai_compatible::{OpenAICompatibleBackend, DEFAULT_HOST};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CoachingAdvice, Goal, ProgressAnalysis, ProgressUpdate};
use crate::settings::AiSettings;

/// Trait defining the interface for all AI backends
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Estimate progress after a new journal entry
    ///
    /// Returns the model's numbers as given; callers normalize them. A reply
    /// that is not JSON is `Error::MalformedResponse`.
    async fn analyze_progress(
        &self,
        goal: &Goal,
        journal_entry: &str,
        history: &[ProgressUpdate],
    ) -> Result<ProgressAnalysis>;

    /// Milestones, habits and advice for a goal, optionally answering a
    /// question. Unparseable replies are already salvaged; only a failed
    /// call is an error.
    async fn coach(
        &self,
        goal: &Goal,
        history: &[ProgressUpdate],
        question: Option<&str>,
    ) -> Result<CoachingAdvice>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Model used for progress estimates
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
#[derive(Clone)]
pub enum AIClient {
    /// OpenAI or any server implementing its chat completions API
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `openai` (default): see `OpenAICompatibleBackend::from_env`
    /// - `mock`: canned responses, no network
    ///
    /// Returns None when the selected backend is not configured.
    pub fn from_env(settings: &AiSettings) -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "openai".to_string());

        match backend.to_lowercase().as_str() {
            "openai" | "openai_compatible" => {
                OpenAICompatibleBackend::from_env(settings).map(AIClient::OpenAICompatible)
            }
            "mock" => Some(AIClient::mock()),
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to openai");
                OpenAICompatibleBackend::from_env(settings).map(AIClient::OpenAICompatible)
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn analyze_progress(
        &self,
        goal: &Goal,
        journal_entry: &str,
        history: &[ProgressUpdate],
    ) -> Result<ProgressAnalysis> {
        match self {
            AIClient::OpenAICompatible(b) => b.analyze_progress(goal, journal_entry, history).await,
            AIClient::Mock(b) => b.analyze_progress(goal, journal_entry, history).await,
        }
    }

    async fn coach(
        &self,
        goal: &Goal,
        history: &[ProgressUpdate],
        question: Option<&str>,
    ) -> Result<CoachingAdvice> {
        match self {
            AIClient::OpenAICompatible(b) => b.coach(goal, history, question).await,
            AIClient::Mock(b) => b.coach(goal, history, question).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_client_mock() {
        let client = AIClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[test]
    fn test_ai_client_delegates_to_openai_backend() {
        let client = AIClient::OpenAICompatible(OpenAICompatibleBackend::new(
            "http://localhost:8000/",
            "gpt-3.5-turbo",
        ));
        assert_eq!(client.model(), "gpt-3.5-turbo");
        assert_eq!(client.host(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = AIClient::mock();
        assert!(client.health_check().await);
    }
}
