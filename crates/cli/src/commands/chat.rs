//! Interactive chat session.
//!
//! Rendering shell only: every answer goes through the same pipeline as
//! the one-shot `ask` command. The session keeps a current document
//! selection and shows the in-memory conversation log on request.

use crate::commands::{build_pipeline, resolve_selection};
use askdocs_core::{AppConfig, AppResult};
use askdocs_rag::{DocumentName, ExchangeOutcome, Selection};
use clap::Args;
use std::io::Write as _;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Start an interactive question/answer session
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Initial document selection, comma separated (default: all)
    #[arg(short, long, value_delimiter = ',')]
    pub docs: Vec<String>,
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Starting chat session");

        let pipeline = build_pipeline(config)?;
        let mut selection = resolve_selection(&self.docs, &pipeline);

        println!("Ask about the selected documents: {}", selection);
        println!("Commands: /docs [names], /history, /quit");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let line = match lines.next_line().await? {
                Some(line) => line,
                None => break,
            };
            let input = line.trim();

            if input.is_empty() {
                continue;
            }

            if input == "/quit" || input == "/exit" {
                break;
            }

            if input == "/history" {
                self.print_history(&pipeline);
                continue;
            }

            if let Some(rest) = input.strip_prefix("/docs") {
                let names: Vec<DocumentName> = rest
                    .split([',', ' '])
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(DocumentName::from)
                    .collect();

                if names.is_empty() {
                    println!("Selected: {}", selection);
                    for name in pipeline.document_names() {
                        println!("  {}", name);
                    }
                } else {
                    selection = Selection::new(names);
                    println!("Selected: {}", selection);
                }
                continue;
            }

            match pipeline.answer(input, &selection).await {
                Ok(answer) => println!("{}\n", answer.text),
                Err(err) => println!("Error: {}\n", err),
            }
        }

        Ok(())
    }

    fn print_history(&self, pipeline: &askdocs_rag::AnswerPipeline) {
        let history = pipeline.history();
        if history.is_empty() {
            println!("No conversation yet.");
            return;
        }

        for entry in history {
            println!("[{}] Q: {}", entry.timestamp.format("%H:%M:%S"), entry.question);
            match &entry.outcome {
                ExchangeOutcome::Answered { answer } => println!("    A: {}", answer),
                ExchangeOutcome::Failed { error } => println!("    failed: {}", error),
            }
        }
    }
}
