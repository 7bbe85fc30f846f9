//! Configuration management for the askdocs pipeline.
//!
//! Configuration is merged from three layers, lowest precedence first:
//! defaults, a YAML config file (`askdocs.yaml`), and environment
//! variables. CLI flags are applied on top via [`AppConfig::with_overrides`].
//!
//! The document registry is part of the configuration: a fixed mapping of
//! document name to the path of its extracted text. The registry is static
//! for the process lifetime — changing it means restarting the service.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Default config file name, resolved relative to the current directory.
const DEFAULT_CONFIG_FILE: &str = "askdocs.yaml";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    #[serde(skip)]
    pub config_file: Option<PathBuf>,

    /// Document registry: name -> path of the extracted text file
    #[serde(default)]
    pub documents: BTreeMap<String, PathBuf>,

    /// Chunking and retrieval parameters
    #[serde(default)]
    pub retrieval: RetrievalSettings,

    /// Embedding encoder collaborator settings
    #[serde(default)]
    pub embedding: EmbeddingSettings,

    /// Completion service collaborator settings
    #[serde(default)]
    pub completion: CompletionSettings,

    /// Optional YAML file overriding the built-in grounded prompt
    #[serde(default)]
    pub prompt_file: Option<PathBuf>,

    /// Log level override
    #[serde(skip)]
    pub log_level: Option<String>,

    /// Disable colored output
    #[serde(skip)]
    pub no_color: bool,
}

/// Chunking and retrieval parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Maximum passage length in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive passages in characters
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Number of passages retrieved per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_top_k() -> usize {
    5
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
        }
    }
}

/// Embedding encoder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// Encoder provider ("trigram" or "ollama")
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// Encoder model identifier
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Embedding vector dimension
    #[serde(default = "default_embedding_dim")]
    pub dimensions: usize,

    /// Number of passages embedded per encoder call during index builds
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Custom encoder endpoint (HTTP providers only)
    #[serde(default)]
    pub endpoint: Option<String>,
}

fn default_embedding_provider() -> String {
    "trigram".to_string()
}

fn default_embedding_model() -> String {
    "trigram-v1".to_string()
}

fn default_embedding_dim() -> usize {
    384
}

fn default_batch_size() -> usize {
    32
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            model: default_embedding_model(),
            dimensions: default_embedding_dim(),
            batch_size: default_batch_size(),
            endpoint: None,
        }
    }
}

/// Completion service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionSettings {
    /// Completion provider ("groq" or "ollama")
    #[serde(default = "default_completion_provider")]
    pub provider: String,

    /// Model identifier
    #[serde(default = "default_completion_model")]
    pub model: String,

    /// Custom service endpoint
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Sampling temperature; low for factual answers
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per generated answer
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env", rename = "apiKeyEnv")]
    pub api_key_env: String,

    /// Resolved API key; never serialized
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_completion_provider() -> String {
    "groq".to_string()
}

fn default_completion_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            provider: default_completion_provider(),
            model: default_completion_model(),
            endpoint: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key_env: default_api_key_env(),
            api_key: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            documents: BTreeMap::new(),
            retrieval: RetrievalSettings::default(),
            embedding: EmbeddingSettings::default(),
            completion: CompletionSettings::default(),
            prompt_file: None,
            log_level: None,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Environment variables:
    /// - `ASKDOCS_CONFIG`: path to the config file (default `askdocs.yaml`)
    /// - `ASKDOCS_PROVIDER`: completion provider
    /// - `ASKDOCS_MODEL`: completion model identifier
    /// - the variable named by `completion.apiKeyEnv` (default `GROQ_API_KEY`)
    /// - `RUST_LOG`: log level
    /// - `NO_COLOR`: disable colored output
    pub fn load() -> AppResult<Self> {
        let config_path = std::env::var("ASKDOCS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if config_path.exists() {
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };
        config.config_file = config_path.exists().then_some(config_path);

        // Environment variables override the file
        if let Ok(provider) = std::env::var("ASKDOCS_PROVIDER") {
            config.completion.provider = provider;
        }

        if let Ok(model) = std::env::var("ASKDOCS_MODEL") {
            config.completion.model = model;
        }

        config.completion.api_key = std::env::var(&config.completion.api_key_env).ok();
        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Parse a YAML config file.
    pub fn from_file(path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })
    }

    /// Apply CLI overrides, which take precedence over both the config
    /// file and environment variables.
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        top_k: Option<usize>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> AppResult<Self> {
        if let Some(config_file) = config_file {
            let mut from_file = Self::from_file(&config_file)?;
            from_file.config_file = Some(config_file);
            // Environment still outranks the newly loaded file
            if let Ok(env_provider) = std::env::var("ASKDOCS_PROVIDER") {
                from_file.completion.provider = env_provider;
            }
            if let Ok(env_model) = std::env::var("ASKDOCS_MODEL") {
                from_file.completion.model = env_model;
            }
            from_file.completion.api_key = std::env::var(&from_file.completion.api_key_env).ok();
            from_file.log_level = self.log_level.take();
            from_file.no_color = self.no_color;
            self = from_file;
        }

        if let Some(provider) = provider {
            self.completion.provider = provider;
        }

        if let Some(model) = model {
            self.completion.model = model;
        }

        if let Some(top_k) = top_k {
            self.retrieval.top_k = top_k;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose && self.log_level.is_none() {
            self.log_level = Some("debug".to_string());
        }

        if no_color {
            self.no_color = true;
        }

        Ok(self)
    }

    /// Validate the configuration for the active collaborators.
    pub fn validate(&self) -> AppResult<()> {
        let completion_providers = ["groq", "ollama"];
        if !completion_providers.contains(&self.completion.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown completion provider: {}. Supported: {}",
                self.completion.provider,
                completion_providers.join(", ")
            )));
        }

        let embedding_providers = ["trigram", "ollama"];
        if !embedding_providers.contains(&self.embedding.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                embedding_providers.join(", ")
            )));
        }

        if self.completion.provider == "groq" && self.completion.api_key.is_none() {
            return Err(AppError::Config(format!(
                "Groq requires an API key in the {} environment variable",
                self.completion.api_key_env
            )));
        }

        if self.retrieval.chunk_size == 0 {
            return Err(AppError::Config(
                "retrieval.chunk_size must be greater than zero".to_string(),
            ));
        }

        if self.retrieval.chunk_overlap >= self.retrieval.chunk_size {
            return Err(AppError::Config(format!(
                "retrieval.chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.retrieval.chunk_overlap, self.retrieval.chunk_size
            )));
        }

        Ok(())
    }
}
