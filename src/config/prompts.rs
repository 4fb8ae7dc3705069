//! Prompt templates for Sammendrag.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub summary: SummaryPrompts,
    pub refine: RefinePrompts,
    pub facts: FactPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}


/// Prompts for single-shot summarization (map phase, combine phase, stuffing).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPrompts {
    pub system: String,
    /// Summarize one chunk (map phase) or the whole stuffed transcript.
    pub chunk: String,
    /// Combine per-chunk summaries into one final summary (reduce phase).
    pub combine: String,
}

impl Default for SummaryPrompts {
    fn default() -> Self {
        Self {
            system: "You are an expert at summarizing spoken-word transcripts. \
                     You write clear, faithful prose summaries and never invent \
                     content that is not present in the transcript."
                .to_string(),

            chunk: r#"Write a concise summary of the following:

{{text}}

CONCISE SUMMARY:"#
                .to_string(),

            combine: r#"The following is a set of summaries of consecutive parts of one transcript:

{{text}}

Take these and distill them into one final, consolidated summary.

FINAL SUMMARY:"#
                .to_string(),
        }
    }
}

/// Prompts for the refine strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinePrompts {
    /// Produce the initial summary from the first chunk.
    pub initial: String,
    /// Revise the running summary given a new chunk of context.
    pub refine: String,
}

impl Default for RefinePrompts {
    fn default() -> Self {
        Self {
            initial: r#"Write a concise but long enough summary to extract all useful key information of the following:

{{text}}

CONCISE SUMMARY:"#
                .to_string(),

            refine: r#"Your job is to produce a final summary.
We have provided an existing summary up to a certain point: {{existing_answer}}
We have the opportunity to refine the existing summary (only if needed) with some more context below.
------------
{{text}}
------------
Given the new context, refine the original summary.
If the context isn't useful, return the original summary."#
                .to_string(),
        }
    }
}

/// Prompts for fact extraction and fact checking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FactPrompts {
    /// Extract a numbered list of short factual statements.
    pub extract: String,
    /// Verify a running summary against the source text.
    pub check: String,
}

impl Default for FactPrompts {
    fn default() -> Self {
        Self {
            extract: r#"Extract the key facts out of this text. Don't include opinions. Give each fact a number and keep them short sentences:

{{text}}"#
                .to_string(),

            check: r#"Below is a summary followed by the source text it was produced from.
Check every claim in the summary against the source text. Correct any claim
the source does not support and remove claims with no basis in the source.
Return only the corrected summary. If every claim is supported, return the
summary unchanged.

SUMMARY:
{{summary}}

SOURCE TEXT:
{{text}}

CORRECTED SUMMARY:"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let summary_path = custom_path.join("summary.toml");
            if summary_path.exists() {
                let content = std::fs::read_to_string(&summary_path)?;
                prompts.summary = toml::from_str(&content)?;
            }

            let refine_path = custom_path.join("refine.toml");
            if refine_path.exists() {
                let content = std::fs::read_to_string(&refine_path)?;
                prompts.refine = toml::from_str(&content)?;
            }

            let facts_path = custom_path.join("facts.toml");
            if facts_path.exists() {
                let content = std::fs::read_to_string(&facts_path)?;
                prompts.facts = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(!prompts.summary.chunk.is_empty());
        assert!(prompts.refine.refine.contains("return the original summary"));
        assert!(prompts.facts.extract.contains("{{text}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Summarize {{text}} at width {{width}}.";
        let mut vars = std::collections::HashMap::new();
        vars.insert("text".to_string(), "hello".to_string());
        vars.insert("width".to_string(), "100".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Summarize hello at width 100.");
    }

    #[test]
    fn test_render_with_custom_precedence() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("tone".to_string(), "neutral".to_string());

        let mut vars = std::collections::HashMap::new();
        vars.insert("tone".to_string(), "formal".to_string());

        let result = prompts.render_with_custom("Tone: {{tone}}", &vars);
        assert_eq!(result, "Tone: formal");
    }
}
