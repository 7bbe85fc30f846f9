//! Command handlers.

mod ask;
mod chat;
mod docs;

pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use docs::DocsCommand;

use askdocs_core::{AppConfig, AppResult};
use askdocs_llm::create_client;
use askdocs_prompt::PromptDefinition;
use askdocs_rag::{
    create_provider, AnswerOptions, AnswerPipeline, Chunker, DocumentName, FsDocumentSource,
    Selection,
};
use std::sync::Arc;

/// Wire the answering pipeline from configuration.
pub fn build_pipeline(config: &AppConfig) -> AppResult<AnswerPipeline> {
    let documents = Arc::new(FsDocumentSource::from_registry(&config.documents));
    let chunker = Chunker::new(config.retrieval.chunk_size, config.retrieval.chunk_overlap);
    let encoder = create_provider(&config.embedding)?;
    let completion = create_client(
        &config.completion.provider,
        config.completion.endpoint.as_deref(),
        config.completion.api_key.as_deref(),
    )?;

    let prompt = match &config.prompt_file {
        Some(path) => askdocs_prompt::load_definition(path)?,
        None => PromptDefinition::default(),
    };

    let options = AnswerOptions {
        top_k: config.retrieval.top_k,
        model: config.completion.model.clone(),
        batch_size: config.embedding.batch_size,
        ..AnswerOptions::default()
    };

    Ok(AnswerPipeline::new(
        documents, chunker, encoder, completion, prompt, options,
    ))
}

/// Turn `--docs` values into a selection; no values means every
/// registered document.
pub fn resolve_selection(docs: &[String], pipeline: &AnswerPipeline) -> Selection {
    if docs.is_empty() {
        Selection::new(pipeline.document_names())
    } else {
        Selection::new(docs.iter().map(|n| DocumentName::from(n.as_str())))
    }
}
