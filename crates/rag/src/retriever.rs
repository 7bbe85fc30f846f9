//! Similarity retrieval over a built index.
//!
//! Thin composition: encode the query with the same encoder the index
//! was built with, then run a source-filtered search.

use crate::embeddings::EmbeddingProvider;
use crate::index::VectorIndex;
use crate::types::{ScoredPassage, Selection};
use askdocs_core::{AppError, AppResult};
use std::sync::Arc;

pub struct Retriever {
    index: Arc<VectorIndex>,
    encoder: Arc<dyn EmbeddingProvider>,
}

impl Retriever {
    pub fn new(index: Arc<VectorIndex>, encoder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { index, encoder }
    }

    /// Retrieve the top-k passages for `query`, restricted to `allowed`
    /// sources.
    ///
    /// Every returned passage's source is a member of `allowed`. An empty
    /// `allowed` set fails with `InvalidSelection` rather than silently
    /// returning nothing.
    pub async fn retrieve(
        &self,
        query: &str,
        allowed: &Selection,
        k: usize,
    ) -> AppResult<Vec<ScoredPassage>> {
        if allowed.is_empty() {
            return Err(AppError::InvalidSelection(
                "no document selected".to_string(),
            ));
        }

        let query_embedding = self.encoder.embed(query).await?;
        let results = self.index.search(&query_embedding, k, allowed)?;

        debug_assert!(results.iter().all(|r| allowed.contains(&r.passage.source)));

        tracing::debug!(
            requested = k,
            returned = results.len(),
            selection = %allowed,
            "retrieval complete"
        );

        Ok(results)
    }
}
