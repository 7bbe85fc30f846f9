//! Embedding encoder collaborator.
//!
//! The pipeline treats the encoder as a black box behind
//! [`EmbeddingProvider`]: text in, fixed-length vector out, deterministic
//! within a process.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
