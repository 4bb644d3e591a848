//! OpenAI-compatible backend implementation
//!
//! Works with the hosted OpenAI API and with any server that implements the
//! chat completions endpoint (vLLM, LocalAI, llama-server, ...).
//!
//! # Configuration
//!
//! Environment variables:
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (default: https://api.openai.com)
//! - `OPENAI_API_KEY` or `OPENAI_COMPATIBLE_API_KEY`: Bearer token
//! - `OPENAI_COMPATIBLE_MODEL`: Use one model for every call (optional)
//!
//! At least one of the host or a key must be set. Per-call models, the
//! timeout and prompt parameters come from settings and the prompt library.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::PromptContext;
use crate::error::{Error, Result};
use crate::models::{CoachingAdvice, Goal, ProgressAnalysis, ProgressUpdate};
use crate::prompts::{PromptId, PromptLibrary};
use crate::settings::AiSettings;

use super::parsing::{coaching_from_response, parse_progress_analysis};
use super::AIBackend;

/// Default API host
pub const DEFAULT_HOST: &str = "https://api.openai.com";

/// OpenAI-compatible backend
///
/// # Example
///
/// ```rust,ignore
/// export OPENAI_API_KEY="sk-..."
///
/// // self-hosted
/// export OPENAI_COMPATIBLE_HOST="http://192.168.1.100:8000"
/// export OPENAI_COMPATIBLE_MODEL="meta-llama/Llama-3.2-3B-Instruct"
/// ```
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
    progress_model: String,
    coaching_model: String,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl OpenAICompatibleBackend {
    /// Create a backend that uses `model` for every call
    pub fn new(base_url: &str, model: &str) -> Self {
        let settings = AiSettings {
            progress_model: model.to_string(),
            coaching_model: model.to_string(),
            ..AiSettings::default()
        };
        Self::with_settings(base_url, None, &settings)
    }

    /// Create with per-call models and timeout from settings
    pub fn with_settings(base_url: &str, api_key: Option<String>, settings: &AiSettings) -> Self {
        Self {
            http_client: build_client(settings.timeout()),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            progress_model: settings.progress_model.clone(),
            coaching_model: settings.coaching_model.clone(),
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
        }
    }

    /// Create a new instance that uses `model` for every call
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            progress_model: model.to_string(),
            coaching_model: model.to_string(),
            ..self.clone()
        }
    }

    /// Replace the prompt library (e.g. embedded-only in tests)
    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = Arc::new(RwLock::new(prompts));
        self
    }

    /// Create from environment variables
    ///
    /// Returns None when neither a host nor an API key is configured.
    pub fn from_env(settings: &AiSettings) -> Option<Self> {
        let host = std::env::var("OPENAI_COMPATIBLE_HOST")
            .ok()
            .filter(|h| !h.is_empty());
        let api_key = std::env::var("OPENAI_API_KEY")
            .or_else(|_| std::env::var("OPENAI_COMPATIBLE_API_KEY"))
            .ok()
            .filter(|k| !k.is_empty());

        if host.is_none() && api_key.is_none() {
            return None;
        }

        let backend = Self::with_settings(
            host.as_deref().unwrap_or(DEFAULT_HOST),
            api_key,
            settings,
        );
        match std::env::var("OPENAI_COMPATIBLE_MODEL") {
            Ok(model) if !model.is_empty() => Some(backend.with_model(&model)),
            _ => Some(backend),
        }
    }

    pub fn coaching_model(&self) -> &str {
        &self.coaching_model
    }

    /// Render a prompt into chat messages plus its sampling parameters
    fn build_request(
        &self,
        id: PromptId,
        model: &str,
        context: &PromptContext,
    ) -> Result<ChatCompletionRequest> {
        let mut prompts = self
            .prompts
            .write()
            .map_err(|_| Error::Prompt("Failed to acquire prompt library lock".into()))?;
        let prompt = prompts.get(id)?;

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = prompt.system_section() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.render_user(context.to_template_vars()),
        });

        Ok(ChatCompletionRequest {
            model: model.to_string(),
            messages,
            temperature: Some(prompt.metadata.temperature),
            max_tokens: Some(prompt.metadata.max_tokens),
            stream: false,
        })
    }

    /// Make a chat completion request and return the reply text
    async fn chat_completion(&self, request: &ChatCompletionRequest) -> Result<String> {
        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.bearer_auth(api_key);
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::InvalidData(format!(
                "Model API error {}: {}",
                status, body
            )));
        }

        let chat_response: ChatCompletionResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| Error::InvalidData("No response from model".into()))
    }
}

fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to build HTTP client with timeout, using defaults");
            Client::new()
        })
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl AIBackend for OpenAICompatibleBackend {
    async fn analyze_progress(
        &self,
        goal: &Goal,
        journal_entry: &str,
        history: &[ProgressUpdate],
    ) -> Result<ProgressAnalysis> {
        let context = PromptContext::for_progress(goal, journal_entry, history);
        let request = self.build_request(PromptId::AnalyzeProgress, &self.progress_model, &context)?;

        let response = self.chat_completion(&request).await?;
        debug!(model = %self.progress_model, "Progress response: {}", response);

        parse_progress_analysis(&response)
    }

    async fn coach(
        &self,
        goal: &Goal,
        history: &[ProgressUpdate],
        question: Option<&str>,
    ) -> Result<CoachingAdvice> {
        let context = PromptContext::for_coaching(goal, history, question);
        let request = self.build_request(PromptId::CoachGoal, &self.coaching_model, &context)?;

        let response = self.chat_completion(&request).await?;
        debug!(model = %self.coaching_model, "Coaching response: {}", response);

        Ok(coaching_from_response(&response))
    }

    async fn health_check(&self) -> bool {
        let mut req_builder = self.http_client.get(format!("{}/v1/models", self.base_url));
        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.bearer_auth(api_key);
        }

        match req_builder.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!(error = %e, host = %self.base_url, "Model health check failed");
                false
            }
        }
    }

    fn model(&self) -> &str {
        &self.progress_model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
