//! Loading prompt definitions from YAML files.

use crate::types::PromptDefinition;
use askdocs_core::{AppError, AppResult};
use std::path::Path;

/// Load a prompt definition from a YAML file.
///
/// Used when a deployment overrides the built-in grounded prompt.
pub fn load_definition(path: &Path) -> AppResult<PromptDefinition> {
    tracing::debug!("Loading prompt definition from {:?}", path);

    let contents = std::fs::read_to_string(path)
        .map_err(|e| AppError::Prompt(format!("Failed to read prompt file {:?}: {}", path, e)))?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents)
        .map_err(|e| AppError::Prompt(format!("Failed to parse prompt file {:?}: {}", path, e)))?;

    if definition.template.is_empty() {
        return Err(AppError::Prompt(format!(
            "Prompt definition '{}' has an empty template",
            definition.id
        )));
    }

    Ok(definition)
}
