//! One-shot ask command.

use crate::commands::{build_pipeline, resolve_selection};
use askdocs_core::{AppConfig, AppResult};
use clap::Args;

/// Ask a single question against the selected documents
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Documents to query, comma separated (default: all registered)
    #[arg(short, long, value_delimiter = ',')]
    pub docs: Vec<String>,

    /// Number of passages to retrieve
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Output the full answer record as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let mut config = config.clone();
        if let Some(top_k) = self.top_k {
            config.retrieval.top_k = top_k;
        }

        let pipeline = build_pipeline(&config)?;
        let selection = resolve_selection(&self.docs, &pipeline);

        tracing::debug!(selection = %selection, "answering question");
        let answer = pipeline.answer(&self.question, &selection).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&answer)?);
        } else {
            println!("{}", answer.text);
        }

        Ok(())
    }
}
