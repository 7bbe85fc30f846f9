//! Askdocs CLI
//!
//! Command-line surface for the retrieval-augmented document Q&A
//! pipeline: one-shot questions, an interactive chat session, and
//! registry inspection.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, DocsCommand};
use askdocs_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Ask questions about a fixed set of reference documents
#[derive(Parser, Debug)]
#[command(name = "askdocs")]
#[command(about = "Retrieval-augmented Q&A over registered documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (default: askdocs.yaml)
    #[arg(short, long, global = true, env = "ASKDOCS_CONFIG")]
    config: Option<PathBuf>,

    /// Completion provider (groq, ollama)
    #[arg(short, long, global = true, env = "ASKDOCS_PROVIDER")]
    provider: Option<String>,

    /// Completion model identifier
    #[arg(short, long, global = true, env = "ASKDOCS_MODEL")]
    model: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single question
    Ask(AskCommand),

    /// Interactive question/answer session
    Chat(ChatCommand),

    /// List registered documents
    Docs(DocsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    // Load base configuration, then apply CLI overrides
    let config = AppConfig::load()?.with_overrides(
        cli.config,
        cli.provider,
        cli.model,
        None,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    )?;

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("askdocs starting");
    tracing::debug!(
        provider = %config.completion.provider,
        model = %config.completion.model,
        documents = config.documents.len(),
        "configuration loaded"
    );

    config.validate()?;

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
        Commands::Docs(_) => "docs",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Docs(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
