//! Memoized vector indexes, keyed by document selection.
//!
//! Index builds are expensive (one encoder call per passage batch), so
//! each distinct selection is built at most once and shared behind an
//! `Arc`. Selections are canonical, so ordering differences hit the same
//! slot. There is no incremental update: a new selection means a new
//! build.

use crate::index::VectorIndex;
use crate::types::Selection;
use askdocs_core::{AppError, AppResult};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

type Slot = Arc<OnceCell<Arc<VectorIndex>>>;

/// Build-once-per-key cache of vector indexes.
#[derive(Default)]
pub struct IndexCache {
    slots: Mutex<HashMap<Selection, Slot>>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index for `selection`, building it on first use.
    ///
    /// At most one build runs per selection; concurrent callers await the
    /// winner instead of starting their own. A failed build leaves the
    /// slot empty, so a later call with the same selection retries
    /// cleanly.
    pub async fn get_or_build<F, Fut>(
        &self,
        selection: &Selection,
        build: F,
    ) -> AppResult<Arc<VectorIndex>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<VectorIndex>>,
    {
        let slot = {
            let mut slots = self.slots.lock().expect("index cache lock poisoned");
            Arc::clone(slots.entry(selection.clone()).or_default())
        };

        if slot.initialized() {
            tracing::debug!(selection = %selection, "index cache hit");
        }

        let index = slot
            .get_or_try_init(|| async { build().await.map(Arc::new) })
            .await?;

        Ok(Arc::clone(index))
    }

    /// Return the index for `selection` if it has been built.
    pub fn get(&self, selection: &Selection) -> AppResult<Arc<VectorIndex>> {
        let slots = self.slots.lock().expect("index cache lock poisoned");
        slots
            .get(selection)
            .and_then(|slot| slot.get().cloned())
            .ok_or_else(|| {
                AppError::IndexUnavailable(format!("no index built for selection [{}]", selection))
            })
    }

    /// Drop the cached index for one selection.
    pub fn invalidate(&self, selection: &Selection) {
        let mut slots = self.slots.lock().expect("index cache lock poisoned");
        if slots.remove(selection).is_some() {
            tracing::info!(selection = %selection, "index invalidated");
        }
    }

    /// Drop every cached index.
    pub fn clear(&self) {
        self.slots
            .lock()
            .expect("index cache lock poisoned")
            .clear();
    }

    /// Number of selections with a completed build.
    pub fn built_count(&self) -> usize {
        self.slots
            .lock()
            .expect("index cache lock poisoned")
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::TrigramProvider;
    use crate::embeddings::EmbeddingProvider;
    use crate::types::{DocumentName, Passage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn corpus() -> Vec<Passage> {
        vec![
            Passage {
                source: DocumentName::from("a"),
                position: 0,
                text: "alpha beta gamma".to_string(),
            },
            Passage {
                source: DocumentName::from("a"),
                position: 1,
                text: "delta epsilon zeta".to_string(),
            },
        ]
    }

    async fn build_corpus_index() -> AppResult<VectorIndex> {
        let encoder = TrigramProvider::new(32);
        VectorIndex::build(corpus(), &encoder, 32).await
    }

    #[tokio::test]
    async fn test_build_once_under_concurrency() {
        let cache = Arc::new(IndexCache::new());
        let builds = Arc::new(AtomicUsize::new(0));
        let selection = Selection::new([DocumentName::from("a")]);

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let builds = Arc::clone(&builds);
                let selection = selection.clone();
                tokio::spawn(async move {
                    cache
                        .get_or_build(&selection, || {
                            builds.fetch_add(1, Ordering::SeqCst);
                            build_corpus_index()
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            assert!(task.await.unwrap().is_ok());
        }

        assert_eq!(builds.load(Ordering::SeqCst), 1, "expected a single build");
        assert_eq!(cache.built_count(), 1);
    }

    #[tokio::test]
    async fn test_same_key_reuses_index() {
        let cache = IndexCache::new();
        let selection = Selection::new([DocumentName::from("a")]);

        let first = cache
            .get_or_build(&selection, build_corpus_index)
            .await
            .unwrap();
        let second = cache
            .get_or_build(&selection, || async {
                panic!("second build must not run")
            })
            .await
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_failed_build_does_not_poison_slot() {
        let cache = IndexCache::new();
        let selection = Selection::new([DocumentName::from("a")]);

        let failed = cache
            .get_or_build(&selection, || async {
                Err(AppError::EmptyCorpus("nothing to index".to_string()))
            })
            .await;
        assert!(failed.is_err());
        assert_eq!(cache.built_count(), 0);

        let retried = cache.get_or_build(&selection, build_corpus_index).await;
        assert!(retried.is_ok());
        assert_eq!(cache.built_count(), 1);
    }

    #[tokio::test]
    async fn test_get_before_build_is_unavailable() {
        let cache = IndexCache::new();
        let selection = Selection::new([DocumentName::from("a")]);

        let result = cache.get(&selection);
        assert!(matches!(result, Err(AppError::IndexUnavailable(_))));
    }

    #[tokio::test]
    async fn test_invalidate_forces_rebuild() {
        let cache = IndexCache::new();
        let builds = AtomicUsize::new(0);
        let selection = Selection::new([DocumentName::from("a")]);

        cache
            .get_or_build(&selection, || {
                builds.fetch_add(1, Ordering::SeqCst);
                build_corpus_index()
            })
            .await
            .unwrap();

        cache.invalidate(&selection);
        assert!(cache.get(&selection).is_err());

        cache
            .get_or_build(&selection, || {
                builds.fetch_add(1, Ordering::SeqCst);
                build_corpus_index()
            })
            .await
            .unwrap();

        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_distinct_selections_build_separately() {
        let cache = IndexCache::new();
        let encoder = TrigramProvider::new(32);

        let sel_a = Selection::new([DocumentName::from("a")]);
        let sel_ab = Selection::new([DocumentName::from("a"), DocumentName::from("b")]);

        let passages_a = corpus();
        let mut passages_ab = corpus();
        passages_ab.push(Passage {
            source: DocumentName::from("b"),
            position: 0,
            text: "eta theta iota".to_string(),
        });

        cache
            .get_or_build(&sel_a, || VectorIndex::build(passages_a, &encoder, 32))
            .await
            .unwrap();
        cache
            .get_or_build(&sel_ab, || VectorIndex::build(passages_ab, &encoder, 32))
            .await
            .unwrap();

        assert_eq!(cache.built_count(), 2);
        assert_eq!(cache.get(&sel_a).unwrap().len(), 2);
        assert_eq!(cache.get(&sel_ab).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_clear_drops_everything() {
        let cache = IndexCache::new();
        let selection = Selection::new([DocumentName::from("a")]);

        cache
            .get_or_build(&selection, build_corpus_index)
            .await
            .unwrap();
        assert_eq!(cache.built_count(), 1);

        cache.clear();
        assert_eq!(cache.built_count(), 0);
        assert!(cache.get(&selection).is_err());
    }

    #[tokio::test]
    async fn test_cleared_cache_rebuilds_identically() {
        let cache = IndexCache::new();
        let encoder = TrigramProvider::new(64);
        let selection = Selection::new([DocumentName::from("a")]);
        let query = encoder.embed("alpha beta").await.unwrap();

        let first = cache
            .get_or_build(&selection, || async {
                let encoder = TrigramProvider::new(64);
                VectorIndex::build(corpus(), &encoder, 32).await
            })
            .await
            .unwrap();
        let first_ranking: Vec<u32> = first
            .search(&query, 5, &selection)
            .unwrap()
            .into_iter()
            .map(|r| r.passage.position)
            .collect();

        cache.clear();

        let second = cache
            .get_or_build(&selection, || async {
                let encoder = TrigramProvider::new(64);
                VectorIndex::build(corpus(), &encoder, 32).await
            })
            .await
            .unwrap();
        let second_ranking: Vec<u32> = second
            .search(&query, 5, &selection)
            .unwrap()
            .into_iter()
            .map(|r| r.passage.position)
            .collect();

        assert_eq!(first_ranking, second_ranking);
    }
}
