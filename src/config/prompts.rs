//! Prompt templates for DocMind.
//!
//! Prompts can be customized by placing a `rag.toml` file in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Answer the model gives when the context does not cover the question.
pub const REFUSAL: &str = "I'm sorry, I don't see that information in the uploaded documents.";

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub rag: RagPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for RAG response generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    /// Behavioural instructions sent as the system message.
    pub system: String,
    /// Final user message. `{{context}}` and `{{question}}` are substituted.
    pub user: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            system: format!(
                "You are DocMind, an intelligent document analysis assistant.\n\
                 Answer the question based strictly on the provided Context.\n\
                 If the information is not in the context, say: \"{}\"\n\
                 Keep your answers professional and concise.",
                REFUSAL
            ),
            user: "Context:\n{{context}}\n\nQuestion:\n{{question}}".to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let rag_path = custom_path.join("rag.toml");
            if rag_path.exists() {
                let content = std::fs::read_to_string(&rag_path)?;
                prompts.rag = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }

    /// The system message, with custom variables applied.
    pub fn system_instructions(&self) -> String {
        self.render_with_custom(&self.rag.system, &HashMap::new())
    }

    /// The final user message carrying retrieved context and the live question.
    pub fn question_message(&self, context: &str, question: &str) -> String {
        // Substituted in one pass so that `{{question}}` inside a document is left alone.
        let mut vars = self.variables.clone();
        vars.remove("context");
        vars.remove("question");
        let template = Self::render(&self.rag.user, &vars);

        let mut out = String::with_capacity(template.len() + context.len() + question.len());
        let mut rest = template.as_str();
        while let Some(pos) = rest.find("{{") {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            if tail.starts_with("{{context}}") {
                out.push_str(context);
                rest = &tail["{{context}}".len()..];
            } else if tail.starts_with("{{question}}") {
                out.push_str(question);
                rest = &tail["{{question}}".len()..];
            } else {
                out.push_str("{{");
                rest = &tail[2..];
            }
        }
        out.push_str(rest);
        out
    }
}
