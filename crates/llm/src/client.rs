//! Completion client abstraction and request/response types.
//!
//! The answering pipeline treats text generation as a black box behind
//! [`LlmClient`]. Every provider failure is classified into one of the
//! [`CompletionError`] conditions so the caller can collapse them into a
//! single generation failure while keeping the cause for logging.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure conditions of the completion service collaborator.
#[derive(Error, Debug)]
pub enum CompletionError {
    /// The service rejected the request due to rate limiting
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The request exceeded the client timeout
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Any other service or transport failure
    #[error("service error: {0}")]
    Service(String),
}

impl CompletionError {
    /// Classify a transport error from reqwest.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CompletionError::Timeout(err.to_string())
        } else {
            CompletionError::Service(err.to_string())
        }
    }
}

/// Completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    /// The user prompt text
    pub prompt: String,

    /// Model identifier (e.g., "llama-3.3-70b-versatile")
    pub model: String,

    /// System prompt (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Sampling temperature (0.0 - 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl LlmRequest {
    /// Create a new request with required fields.
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            system: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the system prompt.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// The generated text
    pub content: String,

    /// Model that produced the response
    pub model: String,

    /// Usage statistics
    #[serde(default)]
    pub usage: LlmUsage,
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LlmUsage {
    #[serde(default)]
    pub prompt_tokens: u32,

    #[serde(default)]
    pub completion_tokens: u32,

    #[serde(default)]
    pub total_tokens: u32,
}

impl LlmUsage {
    /// Create usage stats from prompt and completion token counts.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Trait for completion providers.
///
/// Providers must be cheap to share across tasks; requests carry all
/// per-call state.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Get the provider name (e.g., "groq", "ollama").
    fn provider_name(&self) -> &str;

    /// Perform a single non-streaming completion.
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, CompletionError>;
}
