//! Document registry listing.

use askdocs_core::{AppConfig, AppResult};
use clap::Args;

/// List registered documents
#[derive(Args, Debug)]
pub struct DocsCommand {}

impl DocsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        if config.documents.is_empty() {
            println!("No documents registered. Add a `documents:` section to askdocs.yaml.");
            return Ok(());
        }

        for (name, path) in &config.documents {
            let marker = if path.exists() { "" } else { "  (missing)" };
            println!("{}  {}{}", name, path.display(), marker);
        }

        Ok(())
    }
}
