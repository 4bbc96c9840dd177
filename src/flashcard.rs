//! Flashcard records and model-output parsing.

use crate::error::{MinneError, Result};
use serde::{Deserialize, Serialize};

/// A validated concept/definition pair, the tool's sole output unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub concept: String,
    pub definition: String,
}

/// A flashcard as emitted by the model, before validation.
///
/// The model occasionally drops a field; a record like that is filtered
/// out during sanitization instead of failing the whole batch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFlashcard {
    #[serde(default)]
    pub concept: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
}

impl RawFlashcard {
    /// Validate into a complete flashcard.
    ///
    /// Returns `None` when either field is missing or empty after
    /// trimming.
    pub fn complete(&self) -> Option<Flashcard> {
        let concept = self.concept.as_deref()?.trim();
        let definition = self.definition.as_deref()?.trim();

        if concept.is_empty() || definition.is_empty() {
            return None;
        }

        Some(Flashcard {
            concept: concept.to_string(),
            definition: definition.to_string(),
        })
    }
}

/// Format instructions appended to every generation prompt.
pub fn format_instructions() -> String {
    "Respond with a JSON array of flashcard objects. Each object must contain exactly \
     two string fields: \"concept\" and \"definition\". Respond with the JSON array \
     only, without surrounding prose or code fences."
        .to_string()
}

/// Extract and parse the JSON array of flashcards from a model response.
///
/// Tolerates prose or markdown fences around the array, but a response
/// whose payload is not a JSON array is a generation failure.
pub fn parse_flashcards(response: &str) -> Result<Vec<RawFlashcard>> {
    let json_start = response.find('[');
    let json_end = response.rfind(']');

    let json_str = match (json_start, json_end) {
        (Some(start), Some(end)) if end > start => &response[start..=end],
        _ => response,
    };

    let value: serde_json::Value = serde_json::from_str(json_str).map_err(|e| {
        MinneError::Generation(format!(
            "invalid JSON output: {}. Response was: {}",
            e,
            &response[..response.len().min(200)]
        ))
    })?;

    if !value.is_array() {
        return Err(MinneError::Generation(format!(
            "invalid JSON output: expected an array, got {}",
            json_type_name(&value)
        )));
    }

    serde_json::from_value(value)
        .map_err(|e| MinneError::Generation(format!("invalid flashcard records: {}", e)))
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
