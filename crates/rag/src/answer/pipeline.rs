//! Answering orchestration.
//!
//! Coordinates chunking, index building, retrieval, and generation for
//! one question at a time: `Received -> Retrieving -> Generating ->
//! Completed | Failed`. The completion service is called exactly once per
//! question; nothing on this path retries.

use crate::answer::log::ConversationLog;
use crate::answer::types::{Answer, AnswerPhase, ConversationEntry};
use crate::cache::IndexCache;
use crate::chunker::Chunker;
use crate::documents::DocumentSource;
use crate::embeddings::EmbeddingProvider;
use crate::index::VectorIndex;
use crate::retriever::Retriever;
use crate::types::{DocumentName, ScoredPassage, Selection};
use askdocs_core::{AppError, AppResult};
use askdocs_llm::{LlmClient, LlmRequest};
use askdocs_prompt::{build_grounded_prompt, PromptDefinition};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Tunables for the answering pipeline.
#[derive(Debug, Clone)]
pub struct AnswerOptions {
    /// Passages retrieved per question
    pub top_k: usize,

    /// Completion model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens per answer
    pub max_tokens: u32,

    /// Passages per encoder call during index builds
    pub batch_size: usize,
}

impl Default for AnswerOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.3,
            max_tokens: 1024,
            batch_size: 32,
        }
    }
}

/// The answering orchestrator.
///
/// Owns the index cache and the conversation log; collaborators come in
/// behind trait objects so deployments (and tests) can swap them freely.
pub struct AnswerPipeline {
    documents: Arc<dyn DocumentSource>,
    chunker: Chunker,
    encoder: Arc<dyn EmbeddingProvider>,
    completion: Arc<dyn LlmClient>,
    prompt: PromptDefinition,
    cache: IndexCache,
    log: ConversationLog,
    options: AnswerOptions,
}

impl AnswerPipeline {
    pub fn new(
        documents: Arc<dyn DocumentSource>,
        chunker: Chunker,
        encoder: Arc<dyn EmbeddingProvider>,
        completion: Arc<dyn LlmClient>,
        prompt: PromptDefinition,
        options: AnswerOptions,
    ) -> Self {
        Self {
            documents,
            chunker,
            encoder,
            completion,
            prompt,
            cache: IndexCache::new(),
            log: ConversationLog::new(),
            options,
        }
    }

    /// Answer one question against the selected documents.
    ///
    /// Every exchange is recorded in the conversation log: answers as
    /// regular entries, failures as entries with an error marker.
    pub async fn answer(&self, question: &str, selection: &Selection) -> AppResult<Answer> {
        match self.run(question, selection).await {
            Ok(answer) => {
                tracing::info!(
                    phase = AnswerPhase::Completed.as_str(),
                    sources = answer.sources.len(),
                    retrieved = answer.retrieved,
                    "question answered"
                );
                self.log.append(ConversationEntry::answered(
                    question,
                    &answer.text,
                    answer.sources.clone(),
                ));
                Ok(answer)
            }
            Err(err) => {
                tracing::warn!(
                    phase = AnswerPhase::Failed.as_str(),
                    error = %err,
                    "question failed"
                );
                self.log
                    .append(ConversationEntry::failed(question, err.to_string()));
                Err(err)
            }
        }
    }

    async fn run(&self, question: &str, selection: &Selection) -> AppResult<Answer> {
        tracing::debug!(
            phase = AnswerPhase::Received.as_str(),
            selection = %selection,
            "question received"
        );

        if selection.is_empty() {
            return Err(AppError::InvalidSelection(
                "no document selected".to_string(),
            ));
        }

        let index = self.index_for(selection).await?;

        tracing::debug!(phase = AnswerPhase::Retrieving.as_str(), "retrieving passages");
        let retriever = Retriever::new(index, Arc::clone(&self.encoder));
        let retrieved = retriever
            .retrieve(question, selection, self.options.top_k)
            .await?;

        if retrieved.is_empty() {
            // Not an error: the model answers from an empty context and
            // says it found nothing
            tracing::info!("no passages retrieved, generating from empty context");
        }

        tracing::debug!(phase = AnswerPhase::Generating.as_str(), "generating answer");
        let context = build_context(&retrieved);
        let built = build_grounded_prompt(&self.prompt, question, &context)?;

        let request = LlmRequest::new(built.user, &self.options.model)
            .with_system(built.system)
            .with_temperature(self.options.temperature)
            .with_max_tokens(self.options.max_tokens);

        let response = self.completion.complete(&request).await.map_err(|cause| {
            tracing::warn!(cause = %cause, "completion service failure");
            AppError::GenerationFailed(cause.to_string())
        })?;

        let sources: BTreeSet<DocumentName> = retrieved
            .iter()
            .map(|r| r.passage.source.clone())
            .collect();

        Ok(Answer {
            text: append_sources(response.content, &sources),
            sources,
            retrieved: retrieved.len(),
        })
    }

    /// Resolve the index for a selection, building and caching it on a
    /// miss.
    pub async fn index_for(&self, selection: &Selection) -> AppResult<Arc<VectorIndex>> {
        self.cache
            .get_or_build(selection, || self.build_index(selection))
            .await
    }

    async fn build_index(&self, selection: &Selection) -> AppResult<VectorIndex> {
        let mut passages = Vec::new();
        for name in selection.iter() {
            let text = self.documents.fetch(name).await?;
            passages.extend(self.chunker.chunk_document(name, &text));
        }

        VectorIndex::build(passages, self.encoder.as_ref(), self.options.batch_size).await
    }

    /// Snapshot of the conversation log in insertion order.
    pub fn history(&self) -> Vec<ConversationEntry> {
        self.log.entries()
    }

    /// Registered document names.
    pub fn document_names(&self) -> Vec<DocumentName> {
        self.documents.names()
    }

    /// Drop the cached index for one selection.
    pub fn invalidate(&self, selection: &Selection) {
        self.cache.invalidate(selection);
    }

    /// Drop all cached indexes.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// Format retrieved passages for the prompt context.
fn build_context(retrieved: &[ScoredPassage]) -> String {
    retrieved
        .iter()
        .enumerate()
        .map(|(i, r)| format!("[Document {}]\n{}", i + 1, r.passage.text))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// Append the deduplicated source list to the answer text.
fn append_sources(answer: String, sources: &BTreeSet<DocumentName>) -> String {
    if sources.is_empty() {
        return answer;
    }

    let names: Vec<&str> = sources.iter().map(|s| s.as_str()).collect();
    format!("{}\n\nSources: {}", answer.trim_end(), names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Passage;

    fn scored(source: &str, position: u32, text: &str) -> ScoredPassage {
        ScoredPassage {
            passage: Passage {
                source: DocumentName::from(source),
                position,
                text: text.to_string(),
            },
            score: 0.5,
        }
    }

    #[test]
    fn test_build_context_numbers_passages() {
        let retrieved = vec![scored("a", 0, "first passage"), scored("b", 0, "second")];
        let context = build_context(&retrieved);

        assert!(context.contains("[Document 1]\nfirst passage"));
        assert!(context.contains("[Document 2]\nsecond"));
        assert!(context.contains("---"));
    }

    #[test]
    fn test_build_context_empty() {
        assert_eq!(build_context(&[]), "");
    }

    #[test]
    fn test_append_sources() {
        let sources: BTreeSet<DocumentName> =
            ["budget", "constitution"].map(DocumentName::from).into_iter().collect();

        let text = append_sources("The answer.".to_string(), &sources);
        assert_eq!(text, "The answer.\n\nSources: budget, constitution");
    }

    #[test]
    fn test_append_sources_empty_set_leaves_answer_untouched() {
        let text = append_sources("The answer.".to_string(), &BTreeSet::new());
        assert_eq!(text, "The answer.");
    }
}
