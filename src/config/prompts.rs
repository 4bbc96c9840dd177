//! Prompt templates for Minne.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub summarize: SummarizePrompts,
    pub flashcards: FlashcardPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}


/// Prompt for transcript summarization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizePrompts {
    pub template: String,
}

impl Default for SummarizePrompts {
    fn default() -> Self {
        Self {
            template: r#"You are an expert note taker. Summarize the following video transcript into a clear, well-organized study summary.

Focus on:
1. The main ideas and key concepts covered in the video
2. Important definitions, terms, and facts
3. Examples that illustrate the concepts

Leave out filler, sponsor segments, and channel self-promotion ("please subscribe", "check out my other videos", and the like). Keep the summary faithful to the transcript; do not invent content that is not there.

Transcript:
{{transcript}}"#
                .to_string(),
        }
    }
}

/// Prompt and worked examples for flashcard generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashcardPrompts {
    pub template: String,
    pub examples: String,
}

impl Default for FlashcardPrompts {
    fn default() -> Self {
        Self {
            template: r#"You are an expert educator creating study flashcards.

Generate flashcards from the study material below. Each flashcard pairs a key concept with a concise, self-contained definition that a student could review on its own.

Rules:
1. Cover the most important concepts first
2. Definitions must stand alone without referring to "the text" or "the video"
3. One concept per card; do not bundle multiple ideas
4. Skip filler and meta-commentary in the material

Study material:
{{summary}}

Follow the style of these examples:
{{examples}}

{{format_instructions}}"#
                .to_string(),

            examples: r#"[
  {"concept": "Photosynthesis", "definition": "The process by which green plants use sunlight, water, and carbon dioxide to produce glucose and oxygen."},
  {"concept": "Supply and demand", "definition": "The economic model describing how the price of a good is set by its availability and by buyers' desire for it."},
  {"concept": "Encapsulation", "definition": "The object-oriented principle of bundling data with the methods that operate on it while hiding internal state."}
]"#
            .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default templates, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        // Store custom variables
        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            // Load summarize prompt if file exists
            let summarize_path = custom_path.join("summarize.toml");
            if summarize_path.exists() {
                let content = std::fs::read_to_string(&summarize_path)?;
                prompts.summarize = toml::from_str(&content)?;
            }

            // Load flashcard prompt if file exists
            let flashcards_path = custom_path.join("flashcards.toml");
            if flashcards_path.exists() {
                let content = std::fs::read_to_string(&flashcards_path)?;
                prompts.flashcards = toml::from_str(&content)?;
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
        // Start with custom variables, then override with provided vars
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
