//! Error types for the askdocs pipeline.
//!
//! This module defines the unified error enum shared by every crate in the
//! workspace. Each retrieval/answering failure condition gets its own
//! variant so callers can match on the condition instead of parsing
//! message strings.

use thiserror::Error;

/// Unified error type for the askdocs workspace.
///
/// All conditions are terminal for the current question: nothing here is
/// retried on the core answering path. Retry policy, where it exists at
/// all, lives inside the collaborator clients.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A document name is not present in the registry, or its source
    /// could not be read
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// The selected document set produced zero passages
    #[error("Empty corpus: {0}")]
    EmptyCorpus(String),

    /// No index exists (or an index holds no entries) for the requested
    /// selection
    #[error("Index unavailable: {0}")]
    IndexUnavailable(String),

    /// The caller asked to retrieve against an empty document selection
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// The embedding encoder collaborator failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// The completion service collaborator failed (rate limit, timeout,
    /// or service error — the cause is preserved in the message)
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
