//! Prompt types for the askdocs pipeline.

use serde::{Deserialize, Serialize};

/// A grounded-prompt definition.
///
/// The built-in default instructs the model to answer strictly from the
/// retrieved passages; deployments can replace it with a YAML file via
/// the loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// System instructions sent alongside every question
    pub system: String,

    /// Handlebars template for the user message; receives `question`
    /// and `context` variables
    pub template: String,
}

impl Default for PromptDefinition {
    fn default() -> Self {
        Self {
            id: "answer.grounded.default".to_string(),
            system: DEFAULT_SYSTEM_PROMPT.to_string(),
            template: DEFAULT_USER_TEMPLATE.to_string(),
        }
    }
}

/// Default system instructions for grounded answering.
const DEFAULT_SYSTEM_PROMPT: &str = "\
You are an assistant answering questions about a fixed set of reference documents.

Instructions:
- Answer using only the passages provided in the context
- Do not mention technical terms like \"passages\", \"chunks\", \"context\", or \"retrieval\"
- State the facts plainly, as if you had read the documents yourself
- If the context does not contain the answer, say: \"I could not find this information in the provided documents.\"
- Keep your response concise and factual
";

/// Default user message template.
const DEFAULT_USER_TEMPLATE: &str = "\
Question:
{{question}}

Context from the selected documents:
{{context}}";

/// A rendered prompt, ready for the completion client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System message
    pub system: String,

    /// Rendered user message
    pub user: String,

    /// Identifier of the definition that produced this prompt
    pub prompt_id: String,
}
