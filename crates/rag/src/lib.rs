//! Retrieval-augmented answering pipeline.
//!
//! Answers questions over a fixed set of reference documents:
//! - [`chunker`] splits document text into overlapping passages
//! - [`index`] embeds passages and serves source-filtered similarity
//!   search
//! - [`cache`] memoizes one index build per document selection
//! - [`retriever`] composes query encoding with the filtered search
//! - [`answer`] orchestrates retrieval and generation, attributes
//!   sources, and records every exchange

pub mod answer;
pub mod cache;
pub mod chunker;
pub mod documents;
pub mod embeddings;
pub mod index;
pub mod retriever;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use answer::{Answer, AnswerOptions, AnswerPipeline, ConversationEntry, ExchangeOutcome};
pub use cache::IndexCache;
pub use chunker::Chunker;
pub use documents::{DocumentSource, FsDocumentSource, StaticDocumentSource};
pub use embeddings::{create_provider, EmbeddingProvider};
pub use index::VectorIndex;
pub use retriever::Retriever;
pub use types::{DocumentName, Passage, ScoredPassage, Selection};
