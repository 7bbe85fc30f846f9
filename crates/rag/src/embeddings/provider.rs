//! Embedding provider trait and factory.

use askdocs_core::config::EmbeddingSettings;
use askdocs_core::{AppError, AppResult};
use std::sync::Arc;

/// Trait for embedding encoders.
///
/// Encoders must be deterministic for the same input within a process:
/// index builds and query encoding rely on comparable vectors. Failures
/// surface as `EncodingFailed`.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "trigram", "ollama")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in a batch.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::EncodingFailed("No embedding returned".to_string()))
    }
}

/// Create an embedding provider from configuration.
pub fn create_provider(settings: &EmbeddingSettings) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match settings.provider.as_str() {
        "trigram" => {
            let provider = super::providers::trigram::TrigramProvider::new(settings.dimensions);
            Ok(Arc::new(provider))
        }

        "ollama" => {
            let provider = super::providers::ollama::OllamaEmbedder::new(
                &settings.model,
                settings.dimensions,
                settings.endpoint.as_deref(),
            );
            Ok(Arc::new(provider))
        }

        _ => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: trigram, ollama",
            settings.provider
        ))),
    }
}
