//! Pipeline executor for Minne.
//!
//! Composes the summarizer and generators per input source, sanitizes
//! the model's records into complete flashcards, and normalizes every
//! stage failure into a single user-facing error type.

use crate::config::{Prompts, Settings};
use crate::error::{MinneError, Result};
use crate::flashcard::{Flashcard, RawFlashcard};
use crate::generator::FlashcardGenerator;
use crate::loader::SourceKind;
use crate::model::{CompletionModel, OpenAiModel};
use crate::summarizer::TranscriptSummarizer;
use std::sync::Arc;
use tracing::{error, info, warn};

/// A single flashcard-generation request.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    /// YouTube video URL to summarize and generate from.
    pub youtube_url: Option<String>,
    /// Document files to generate from, processed in order.
    pub files: Vec<String>,
    /// Maximum number of flashcards per source; the configured default
    /// applies when unset.
    pub max_flashcards: Option<usize>,
}

/// The main executor for the flashcard pipeline.
pub struct Executor {
    settings: Settings,
    prompts: Prompts,
    summary_model: Arc<dyn CompletionModel>,
    generation_model: Arc<dyn CompletionModel>,
}

impl Executor {
    /// Create an executor from settings, with OpenAI-backed models.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let summary_model: Arc<dyn CompletionModel> = Arc::new(OpenAiModel::new(
            &settings.model.summary_model,
            settings.model.temperature,
        ));
        let generation_model: Arc<dyn CompletionModel> = Arc::new(OpenAiModel::new(
            &settings.model.generation_model,
            settings.model.temperature,
        ));

        Ok(Self {
            settings,
            prompts,
            summary_model,
            generation_model,
        })
    }

    /// Create an executor with custom models.
    pub fn with_models(
        settings: Settings,
        prompts: Prompts,
        summary_model: Arc<dyn CompletionModel>,
        generation_model: Arc<dyn CompletionModel>,
    ) -> Self {
        Self {
            settings,
            prompts,
            summary_model,
            generation_model,
        }
    }

    /// Run the pipeline for one request.
    ///
    /// Returns URL-derived cards first, then file-derived cards in file
    /// order. With neither a URL nor files the result is an empty list,
    /// not an error. The first failing source aborts the run with an
    /// `InvalidInput` error naming it.
    pub async fn run(&self, request: &GenerateRequest) -> Result<Vec<Flashcard>> {
        let max_flashcards = request
            .max_flashcards
            .unwrap_or(self.settings.limits.max_flashcards);

        let mut flashcards = Vec::new();

        if let Some(url) = &request.youtube_url {
            let cards = self.cards_from_url(url, max_flashcards).await.map_err(|e| {
                error!("Error processing YouTube URL {}: {}", url, e);
                MinneError::InvalidInput(format!("error processing YouTube URL: {}", e))
            })?;
            info!("Generated {} flashcard(s) from {}", cards.len(), url);
            flashcards.extend(cards);
        }

        for file in &request.files {
            let cards = self.cards_from_file(file, max_flashcards).await.map_err(|e| {
                error!("Error processing {}: {}", file, e);
                MinneError::InvalidInput(format!("error processing {}: {}", file, e))
            })?;
            info!("Generated {} flashcard(s) from {}", cards.len(), file);
            flashcards.extend(cards);
        }

        // The cap holds for the combined list as well, not just per source
        flashcards.truncate(max_flashcards);

        Ok(flashcards)
    }

    async fn cards_from_url(&self, url: &str, max_flashcards: usize) -> Result<Vec<Flashcard>> {
        let summarizer = TranscriptSummarizer::new(
            self.summary_model.clone(),
            self.prompts.clone(),
            self.settings.limits.max_video_seconds,
            self.settings.chunking.transcript_chunk_size,
        );

        let summary = summarizer.summarize(url).await?;
        let raw = self
            .generator()
            .from_summary(&summary, max_flashcards)
            .await?;

        Ok(sanitize(raw))
    }

    async fn cards_from_file(&self, file: &str, max_flashcards: usize) -> Result<Vec<Flashcard>> {
        let kind = SourceKind::detect(file)?;
        let inputs = [file.to_string()];
        let raw = self
            .generator()
            .from_files(kind, &inputs, max_flashcards)
            .await?;

        Ok(sanitize(raw))
    }

    fn generator(&self) -> FlashcardGenerator {
        FlashcardGenerator::new(
            self.generation_model.clone(),
            self.prompts.clone(),
            self.settings.chunking.clone(),
        )
    }
}

/// Keep only complete records; malformed ones are dropped with a
/// warning, never a failure.
fn sanitize(raw: Vec<RawFlashcard>) -> Vec<Flashcard> {
    let mut flashcards = Vec::with_capacity(raw.len());

    for card in raw {
        match card.complete() {
            Some(flashcard) => flashcards.push(flashcard),
            None => warn!("Skipping malformed flashcard: {:?}", card),
        }
    }

    flashcards
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Model that answers every prompt with the same response.
    struct StaticModel(String);

    #[async_trait::async_trait]
    impl CompletionModel for StaticModel {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_run_sanitizes_file_derived_cards() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terms.csv");
        std::fs::write(&path, "term,meaning\nosmosis,water crossing a membrane\n").unwrap();

        let response = r#"[
            {"concept": "Osmosis", "definition": "Water crossing a membrane."},
            {"concept": "Orphan"}
        ]"#;
        let model: Arc<dyn CompletionModel> = Arc::new(StaticModel(response.to_string()));
        let executor = Executor::with_models(
            Settings::default(),
            Prompts::default(),
            model.clone(),
            model,
        );

        let request = GenerateRequest {
            files: vec![path.display().to_string()],
            ..GenerateRequest::default()
        };

        let cards = executor.run(&request).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].concept, "Osmosis");
    }

    #[tokio::test]
    async fn test_run_with_no_inputs_returns_empty_list() {
        let executor = Executor::new(Settings::default()).unwrap();
        let cards = executor.run(&GenerateRequest::default()).await.unwrap();
        assert!(cards.is_empty());
    }

    #[tokio::test]
    async fn test_run_with_unsupported_file_names_it() {
        let executor = Executor::new(Settings::default()).unwrap();
        let request = GenerateRequest {
            files: vec!["notes.txt".to_string()],
            ..GenerateRequest::default()
        };

        let err = executor.run(&request).await.unwrap_err();
        assert!(matches!(err, MinneError::InvalidInput(_)));
        assert!(err.to_string().contains("notes.txt"));
    }

    #[test]
    fn test_sanitize_drops_incomplete_records() {
        let raw = vec![
            RawFlashcard {
                concept: Some("Osmosis".to_string()),
                definition: Some("Water crossing a membrane.".to_string()),
            },
            RawFlashcard {
                concept: Some("Orphan".to_string()),
                definition: None,
            },
            RawFlashcard {
                concept: Some("".to_string()),
                definition: Some("Empty concept".to_string()),
            },
        ];

        let cards = sanitize(raw);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].concept, "Osmosis");
    }
}
