//! Flashcard generation.
//!
//! Turns a summary string or a set of loaded documents into flashcard
//! records through templated model calls. Long inputs are chunked and
//! processed in batches, stopping as soon as the requested number of
//! cards has been produced.

use crate::config::{ChunkingSettings, Prompts};
use crate::error::{MinneError, Result};
use crate::flashcard::{self, RawFlashcard};
use crate::loader::{create_loader, Loader, SourceKind};
use crate::model::CompletionModel;
use crate::splitter::CharacterSplitter;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Generator for flashcards from summaries and documents.
pub struct FlashcardGenerator {
    model: Arc<dyn CompletionModel>,
    prompts: Prompts,
    chunking: ChunkingSettings,
}

impl FlashcardGenerator {
    pub fn new(
        model: Arc<dyn CompletionModel>,
        prompts: Prompts,
        chunking: ChunkingSettings,
    ) -> Self {
        Self {
            model,
            prompts,
            chunking,
        }
    }

    /// Render the generation prompt for a piece of study material.
    fn render_prompt(&self, material: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("summary".to_string(), material.to_string());
        vars.insert(
            "examples".to_string(),
            self.prompts.flashcards.examples.clone(),
        );
        vars.insert(
            "format_instructions".to_string(),
            flashcard::format_instructions(),
        );

        self.prompts
            .render_with_custom(&self.prompts.flashcards.template, &vars)
    }

    /// One model invocation over the given material, parsed into records.
    async fn generate_batch(&self, material: &str) -> Result<Vec<RawFlashcard>> {
        let response = self.model.complete(&self.render_prompt(material)).await?;
        flashcard::parse_flashcards(&response)
    }

    /// Generate flashcards from a summary string.
    ///
    /// One model call; the result is truncated to `max_flashcards`,
    /// never padded.
    #[instrument(skip(self, summary))]
    pub async fn from_summary(
        &self,
        summary: &str,
        max_flashcards: usize,
    ) -> Result<Vec<RawFlashcard>> {
        debug!("Generating flashcards from summary");

        let mut cards = self.generate_batch(summary).await?;
        cards.truncate(max_flashcards);
        Ok(cards)
    }

    /// Generate flashcards from the given files.
    ///
    /// Documents are chunked and processed in sequential batches; the
    /// loop stops early once `max_flashcards` records have accumulated,
    /// avoiding unnecessary model calls.
    #[instrument(skip(self, inputs), fields(kind = %kind))]
    pub async fn from_files(
        &self,
        kind: SourceKind,
        inputs: &[String],
        max_flashcards: usize,
    ) -> Result<Vec<RawFlashcard>> {
        let loader = create_loader(kind, inputs);
        let documents = loader.load().await.map_err(|e| match e {
            loader_err @ MinneError::Loader(_) => loader_err,
            other => MinneError::Loader(other.to_string()),
        })?;

        let splitter = CharacterSplitter::new(
            self.chunking.file_chunk_size,
            self.chunking.file_chunk_overlap,
        );
        let chunks = splitter.split_documents(&documents);
        debug!(
            "Split {} document(s) into {} chunk(s)",
            documents.len(),
            chunks.len()
        );

        let batch_size = self.chunking.batch_size.max(1);
        let mut cards = Vec::new();

        for (index, batch) in chunks.chunks(batch_size).enumerate() {
            let material = batch.join(" ");
            let batch_cards = self.generate_batch(&material).await.map_err(|e| {
                error!("Failed to process chunk batch {}: {}", index, e);
                MinneError::Generation(format!("failed to process chunk batch {}: {}", index, e))
            })?;

            cards.extend(batch_cards);

            if cards.len() >= max_flashcards {
                debug!("Reached requested card count after batch {}", index);
                break;
            }
        }

        cards.truncate(max_flashcards);
        Ok(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Model returning canned responses in order, counting calls.
    struct ScriptedModel {
        responses: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedModel {
        fn new(responses: Vec<String>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().rev().collect()),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl CompletionModel for ScriptedModel {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| MinneError::OpenAI("no scripted response left".to_string()))
        }
    }

    fn cards_json(count: usize) -> String {
        let cards: Vec<String> = (0..count)
            .map(|i| {
                format!(
                    r#"{{"concept": "Concept {i}", "definition": "Definition {i}"}}"#
                )
            })
            .collect();
        format!("[{}]", cards.join(","))
    }

    fn generator(model: Arc<ScriptedModel>, chunking: ChunkingSettings) -> FlashcardGenerator {
        FlashcardGenerator::new(model, Prompts::default(), chunking)
    }

    fn write_material(dir: &std::path::Path, rows: usize) -> String {
        let path = dir.join("material.csv");
        let mut content = String::from("term,meaning\n");
        for i in 0..rows {
            content.push_str(&format!("term {i},a meaning that fills the row out {i}\n"));
        }
        std::fs::write(&path, content).unwrap();
        path.display().to_string()
    }

    #[tokio::test]
    async fn test_from_summary_truncates_to_max() {
        let model = Arc::new(ScriptedModel::new(vec![cards_json(12)]));
        let generator = generator(model.clone(), ChunkingSettings::default());

        let cards = generator.from_summary("a summary", 10).await.unwrap();
        assert_eq!(cards.len(), 10);
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_from_summary_never_pads() {
        let model = Arc::new(ScriptedModel::new(vec![cards_json(3)]));
        let generator = generator(model, ChunkingSettings::default());

        let cards = generator.from_summary("a summary", 10).await.unwrap();
        assert_eq!(cards.len(), 3);
    }

    #[tokio::test]
    async fn test_from_summary_object_response_is_generation_error() {
        let model = Arc::new(ScriptedModel::new(vec![r#"{"concept": "x"}"#.to_string()]));
        let generator = generator(model, ChunkingSettings::default());

        let err = generator.from_summary("a summary", 10).await.unwrap_err();
        assert!(matches!(err, MinneError::Generation(_)));
    }

    #[tokio::test]
    async fn test_from_files_stops_after_quota_is_met() {
        let dir = tempfile::tempdir().unwrap();
        // Small chunks so the material spans several batches
        let chunking = ChunkingSettings {
            file_chunk_size: 50,
            file_chunk_overlap: 0,
            batch_size: 2,
            ..ChunkingSettings::default()
        };
        let input = write_material(dir.path(), 40);

        // The first batch alone satisfies the quota; later batches would
        // exhaust the script and fail if they were requested.
        let model = Arc::new(ScriptedModel::new(vec![cards_json(6)]));
        let generator = generator(model.clone(), chunking);

        let cards = generator
            .from_files(SourceKind::Csv, &[input], 5)
            .await
            .unwrap();

        assert_eq!(cards.len(), 5);
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_from_files_accumulates_across_batches() {
        let dir = tempfile::tempdir().unwrap();
        let chunking = ChunkingSettings {
            file_chunk_size: 50,
            file_chunk_overlap: 0,
            batch_size: 2,
            ..ChunkingSettings::default()
        };
        let input = write_material(dir.path(), 10);

        let model = Arc::new(ScriptedModel::new(vec![
            cards_json(2),
            cards_json(2),
            cards_json(2),
        ]));
        let generator = generator(model.clone(), chunking);

        let cards = generator
            .from_files(SourceKind::Csv, &[input], 5)
            .await
            .unwrap();

        assert_eq!(cards.len(), 5);
        assert_eq!(model.call_count(), 3);
    }

    #[tokio::test]
    async fn test_from_files_bad_batch_stops_processing() {
        let dir = tempfile::tempdir().unwrap();
        let chunking = ChunkingSettings {
            file_chunk_size: 50,
            file_chunk_overlap: 0,
            batch_size: 2,
            ..ChunkingSettings::default()
        };
        let input = write_material(dir.path(), 10);

        let model = Arc::new(ScriptedModel::new(vec![
            cards_json(1),
            "not json at all".to_string(),
        ]));
        let generator = generator(model.clone(), chunking);

        let err = generator
            .from_files(SourceKind::Csv, &[input], 10)
            .await
            .unwrap_err();

        assert!(matches!(err, MinneError::Generation(_)));
        assert!(err.to_string().contains("chunk batch 1"));
        assert_eq!(model.call_count(), 2);
    }

    #[tokio::test]
    async fn test_from_files_unreadable_input_is_loader_error() {
        let model = Arc::new(ScriptedModel::new(Vec::new()));
        let generator = generator(model.clone(), ChunkingSettings::default());

        let err = generator
            .from_files(
                SourceKind::Csv,
                &["/nonexistent/material.csv".to_string()],
                10,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, MinneError::Loader(_)));
        assert_eq!(model.call_count(), 0);
    }
}
