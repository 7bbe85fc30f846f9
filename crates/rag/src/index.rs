//! In-memory vector index with source-filtered similarity search.
//!
//! Holds one embedding per passage for the lifetime of a build. Entries
//! are partitioned by source so a search restricts candidates *before*
//! ranking — post-filtering a global top-k could return fewer than k
//! results even when enough allowed passages exist.

use crate::embeddings::EmbeddingProvider;
use crate::types::{DocumentName, Passage, ScoredPassage, Selection};
use askdocs_core::{AppError, AppResult};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::BTreeMap;

/// Encoder batches in flight at once during a build.
const MAX_CONCURRENT_BATCHES: usize = 4;

struct IndexEntry {
    passage: Passage,
    embedding: Vec<f32>,
}

/// Immutable similarity index over a fixed set of passages.
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    by_source: BTreeMap<DocumentName, Vec<usize>>,
    dimensions: usize,
}

impl VectorIndex {
    /// Embed every passage and build the index.
    ///
    /// Embedding calls are batched (`batch_size` texts per call) and run
    /// with bounded concurrency; results keep passage order, so repeated
    /// builds from the same passages are identical.
    ///
    /// Fails with `EmptyCorpus` when there are no passages to index.
    pub async fn build(
        passages: Vec<Passage>,
        encoder: &dyn EmbeddingProvider,
        batch_size: usize,
    ) -> AppResult<Self> {
        if passages.is_empty() {
            return Err(AppError::EmptyCorpus(
                "document selection produced no passages".to_string(),
            ));
        }

        let batch_size = batch_size.max(1);
        let texts: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();

        tracing::info!(
            passages = passages.len(),
            batch_size,
            encoder = encoder.provider_name(),
            "building vector index"
        );

        let batches: Vec<Vec<String>> = texts.chunks(batch_size).map(|c| c.to_vec()).collect();

        let results: Vec<Vec<Vec<f32>>> = stream::iter(batches)
            .map(|batch| async move { encoder.embed_batch(&batch).await })
            .buffered(MAX_CONCURRENT_BATCHES)
            .try_collect()
            .await?;

        let embeddings: Vec<Vec<f32>> = results.into_iter().flatten().collect();

        if embeddings.len() != passages.len() {
            return Err(AppError::EncodingFailed(format!(
                "encoder returned {} embeddings for {} passages",
                embeddings.len(),
                passages.len()
            )));
        }

        let dimensions = embeddings[0].len();
        let mut entries = Vec::with_capacity(passages.len());
        let mut by_source: BTreeMap<DocumentName, Vec<usize>> = BTreeMap::new();

        for (passage, embedding) in passages.into_iter().zip(embeddings) {
            if embedding.len() != dimensions {
                return Err(AppError::EncodingFailed(format!(
                    "inconsistent embedding dimensions: {} vs {}",
                    embedding.len(),
                    dimensions
                )));
            }

            by_source
                .entry(passage.source.clone())
                .or_default()
                .push(entries.len());
            entries.push(IndexEntry { passage, embedding });
        }

        tracing::debug!(
            entries = entries.len(),
            sources = by_source.len(),
            dimensions,
            "vector index built"
        );

        Ok(Self {
            entries,
            by_source,
            dimensions,
        })
    }

    /// Search for the top-k passages most similar to the query vector,
    /// considering only passages whose source is in `allowed`.
    ///
    /// Results are ordered by descending cosine similarity; ties break on
    /// insertion order for determinism. Fewer than k matching candidates
    /// yield a shorter result, not an error.
    pub fn search(
        &self,
        query: &[f32],
        k: usize,
        allowed: &Selection,
    ) -> AppResult<Vec<ScoredPassage>> {
        if self.entries.is_empty() {
            return Err(AppError::IndexUnavailable(
                "index holds no passages".to_string(),
            ));
        }

        if query.len() != self.dimensions {
            return Err(AppError::EncodingFailed(format!(
                "query vector has {} dimensions, index has {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut scored: Vec<(usize, f32)> = allowed
            .iter()
            .filter_map(|name| self.by_source.get(name))
            .flatten()
            .map(|&idx| (idx, cosine_similarity(query, &self.entries[idx].embedding)))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(idx, score)| ScoredPassage {
                passage: self.entries[idx].passage.clone(),
                score,
            })
            .collect())
    }

    /// Number of indexed passages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sources present in the index, sorted.
    pub fn sources(&self) -> Vec<DocumentName> {
        self.by_source.keys().cloned().collect()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Cosine similarity; zero vectors score 0.0.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::TrigramProvider;

    fn passage(source: &str, position: u32, text: &str) -> Passage {
        Passage {
            source: DocumentName::from(source),
            position,
            text: text.to_string(),
        }
    }

    fn three_doc_corpus() -> Vec<Passage> {
        vec![
            passage("a", 0, "citizens have fundamental rights and duties"),
            passage("a", 1, "the parliament passes laws each session"),
            passage("b", 0, "budget spending covers roads and schools"),
            passage("b", 1, "taxes fund the national budget programs"),
            passage("c", 0, "mountain tourism brings seasonal revenue"),
        ]
    }

    #[tokio::test]
    async fn test_build_empty_corpus_fails() {
        let encoder = TrigramProvider::new(64);
        let result = VectorIndex::build(vec![], &encoder, 32).await;
        assert!(matches!(result, Err(AppError::EmptyCorpus(_))));
    }

    #[tokio::test]
    async fn test_build_indexes_all_passages() {
        let encoder = TrigramProvider::new(64);
        let index = VectorIndex::build(three_doc_corpus(), &encoder, 2)
            .await
            .unwrap();

        assert_eq!(index.len(), 5);
        assert_eq!(index.dimensions(), 64);
        assert_eq!(
            index.sources(),
            vec![
                DocumentName::from("a"),
                DocumentName::from("b"),
                DocumentName::from("c")
            ]
        );
    }

    #[tokio::test]
    async fn test_search_respects_source_filter() {
        let encoder = TrigramProvider::new(128);
        let index = VectorIndex::build(three_doc_corpus(), &encoder, 32)
            .await
            .unwrap();
        let query = encoder.embed("budget spending").await.unwrap();

        // Every non-empty subset of {a, b, c}
        let names = ["a", "b", "c"];
        for mask in 1u8..8 {
            let allowed: Selection = names
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, n)| DocumentName::from(*n))
                .collect();

            let results = index.search(&query, 5, &allowed).unwrap();
            assert!(
                results.iter().all(|r| allowed.contains(&r.passage.source)),
                "result outside filter for mask {:#b}",
                mask
            );
        }
    }

    #[tokio::test]
    async fn test_filtering_happens_before_ranking() {
        let encoder = TrigramProvider::new(128);
        let index = VectorIndex::build(three_doc_corpus(), &encoder, 32)
            .await
            .unwrap();

        // A query that ranks document "b" passages highest globally must
        // still return "a" passages when only "a" is allowed.
        let query = encoder.embed("national budget spending").await.unwrap();
        let only_a = Selection::new([DocumentName::from("a")]);

        let results = index.search(&query, 2, &only_a).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results
            .iter()
            .all(|r| r.passage.source == DocumentName::from("a")));
    }

    #[tokio::test]
    async fn test_fewer_candidates_than_k() {
        let encoder = TrigramProvider::new(64);
        let index = VectorIndex::build(three_doc_corpus(), &encoder, 32)
            .await
            .unwrap();
        let query = encoder.embed("tourism").await.unwrap();

        let only_c = Selection::new([DocumentName::from("c")]);
        let results = index.search(&query, 5, &only_c).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_results_ranked_descending() {
        let encoder = TrigramProvider::new(128);
        let index = VectorIndex::build(three_doc_corpus(), &encoder, 32)
            .await
            .unwrap();
        let query = encoder.embed("budget taxes").await.unwrap();

        let all: Selection = ["a", "b", "c"].map(DocumentName::from).into_iter().collect();
        let results = index.search(&query, 5, &all).unwrap();

        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn test_unknown_source_in_filter_is_ignored() {
        let encoder = TrigramProvider::new(64);
        let index = VectorIndex::build(three_doc_corpus(), &encoder, 32)
            .await
            .unwrap();
        let query = encoder.embed("anything").await.unwrap();

        let allowed = Selection::new([DocumentName::from("a"), DocumentName::from("zzz")]);
        let results = index.search(&query, 5, &allowed).unwrap();
        assert!(results
            .iter()
            .all(|r| r.passage.source == DocumentName::from("a")));
    }

    #[tokio::test]
    async fn test_query_dimension_mismatch() {
        let encoder = TrigramProvider::new(64);
        let index = VectorIndex::build(three_doc_corpus(), &encoder, 32)
            .await
            .unwrap();

        let result = index.search(&[0.0; 8], 5, &Selection::new([DocumentName::from("a")]));
        assert!(matches!(result, Err(AppError::EncodingFailed(_))));
    }

    #[tokio::test]
    async fn test_rebuild_is_deterministic() {
        let encoder = TrigramProvider::new(128);
        let query = encoder.embed("budget spending").await.unwrap();
        let all: Selection = ["a", "b", "c"].map(DocumentName::from).into_iter().collect();

        let first = VectorIndex::build(three_doc_corpus(), &encoder, 2)
            .await
            .unwrap();
        let second = VectorIndex::build(three_doc_corpus(), &encoder, 3)
            .await
            .unwrap();

        let rank = |index: &VectorIndex| -> Vec<(DocumentName, u32)> {
            index
                .search(&query, 5, &all)
                .unwrap()
                .into_iter()
                .map(|r| (r.passage.source, r.passage.position))
                .collect()
        };

        assert_eq!(rank(&first), rank(&second));
    }

    #[test]
    fn test_cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
