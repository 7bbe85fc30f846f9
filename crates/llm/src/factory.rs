//! Completion client factory.
//!
//! Resolves a provider name to a concrete client implementation.

use crate::client::LlmClient;
use crate::providers::{GroqClient, OllamaClient};
use askdocs_core::{AppError, AppResult};
use std::sync::Arc;

/// Create a completion client for the given provider.
///
/// # Arguments
/// * `provider` - Provider identifier ("groq" or "ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key (required for Groq)
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "groq" => {
            let api_key = api_key.ok_or_else(|| {
                AppError::Config("Groq provider requires an API key".to_string())
            })?;
            let client = match endpoint {
                Some(url) => GroqClient::with_base_url(api_key, url),
                None => GroqClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        "ollama" => {
            let client = match endpoint {
                Some(url) => OllamaClient::with_base_url(url),
                None => OllamaClient::new(),
            };
            Ok(Arc::new(client))
        }
        _ => Err(AppError::Config(format!(
            "Unknown completion provider: {}. Supported: groq, ollama",
            provider
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_groq_client() {
        let client = create_client("groq", None, Some("gsk-test")).unwrap();
        assert_eq!(client.provider_name(), "groq");
    }

    #[test]
    fn test_groq_requires_api_key() {
        let result = create_client("groq", None, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_create_ollama_client() {
        let client = create_client("ollama", None, None).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_create_ollama_with_custom_endpoint() {
        let client = create_client("ollama", Some("http://localhost:8080"), None);
        assert!(client.is_ok());
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None, None) {
            Err(err) => assert!(err.to_string().contains("Unknown completion provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
