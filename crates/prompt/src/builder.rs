//! Prompt builder for rendering grounded-answer templates.

use crate::types::{BuiltPrompt, PromptDefinition};
use askdocs_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Build a grounded prompt from a definition, a question, and the
/// formatted retrieval context.
pub fn build_grounded_prompt(
    definition: &PromptDefinition,
    question: &str,
    context: &str,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    let mut variables = HashMap::new();
    variables.insert("question".to_string(), question.to_string());
    variables.insert("context".to_string(), context.to_string());

    let user = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt {
        system: definition.system.clone(),
        user,
        prompt_id: definition.id.clone(),
    })
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text output; no HTML escaping
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_simple_template() {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "What is the budget?".to_string());

        let result = render_template("Q: {{question}}", &vars);
        assert_eq!(result.unwrap(), "Q: What is the budget?");
    }

    #[test]
    fn test_build_grounded_prompt() {
        let def = PromptDefinition::default();
        let built =
            build_grounded_prompt(&def, "What is the budget?", "[Document 1]\nThe budget is X.")
                .unwrap();

        assert!(built.user.contains("What is the budget?"));
        assert!(built.user.contains("The budget is X."));
        assert_eq!(built.prompt_id, "answer.grounded.default");
        assert!(!built.system.is_empty());
    }

    #[test]
    fn test_no_html_escaping() {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "a < b & c".to_string());

        let result = render_template("{{question}}", &vars).unwrap();
        assert_eq!(result, "a < b & c");
    }

    #[test]
    fn test_missing_variable_renders_empty() {
        let vars = HashMap::new();
        let result = render_template("Q: {{missing}}", &vars);
        assert_eq!(result.unwrap(), "Q: ");
    }
}
