//! Completion service integration for the askdocs pipeline.
//!
//! Provider-agnostic abstraction over text-generation backends. The
//! answering pipeline calls [`LlmClient::complete`] exactly once per
//! question; failure classification lives in [`CompletionError`].
//!
//! # Providers
//! - **Groq**: hosted OpenAI-compatible chat completions (default)
//! - **Ollama**: local LLM runtime
//!
//! # Example
//! ```no_run
//! use askdocs_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Hello, world!", "llama3");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{CompletionError, LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{GroqClient, OllamaClient};
