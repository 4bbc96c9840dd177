//! Transcript summarization.
//!
//! Fetches a video's transcript, validates its metadata against the
//! duration ceiling, and condenses it into a single summary string with
//! one model call.

use crate::config::Prompts;
use crate::error::{MinneError, Result};
use crate::loader::{Document, Loader, YoutubeTranscriptLoader};
use crate::model::CompletionModel;
use crate::splitter::CharacterSplitter;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// Summarizer for video transcripts.
pub struct TranscriptSummarizer {
    model: Arc<dyn CompletionModel>,
    prompts: Prompts,
    max_video_seconds: f64,
    chunk_size: usize,
}

impl TranscriptSummarizer {
    pub fn new(
        model: Arc<dyn CompletionModel>,
        prompts: Prompts,
        max_video_seconds: f64,
        chunk_size: usize,
    ) -> Self {
        Self {
            model,
            prompts,
            max_video_seconds,
            chunk_size,
        }
    }

    /// Summarize the transcript of the video at `url`.
    ///
    /// Every failure up to and including metadata validation surfaces as
    /// a `VideoTranscript` error carrying the URL; the duration ceiling
    /// is enforced before any model call is made.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn summarize(&self, url: &str) -> Result<String> {
        let loader = YoutubeTranscriptLoader::new(vec![url.to_string()]);
        let documents = loader.load().await.map_err(|e| {
            MinneError::transcript(url, format!("no video transcript available: {}", e))
        })?;

        let (title, length) = self.validate(&documents, url)?;

        // Normalize the transcript to a consistent granularity before
        // reassembly; word truncation at chunk boundaries is acceptable.
        let splitter = CharacterSplitter::new(self.chunk_size, 0);
        let chunks = splitter.split_documents(&documents);
        let transcript = chunks.join(" ");

        info!("Summarizing '{}' ({:.0} seconds)", title, length);

        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), transcript);
        let prompt = self
            .prompts
            .render_with_custom(&self.prompts.summarize.template, &vars);

        // The model's natural-language output is the summary, verbatim.
        self.model.complete(&prompt).await
    }

    /// Check that a document was produced and carries usable metadata.
    fn validate(&self, documents: &[Document], url: &str) -> Result<(String, f64)> {
        let document = documents
            .first()
            .ok_or_else(|| MinneError::transcript(url, "no documents loaded from video"))?;

        // An empty title or zero length is as useless as an absent one
        let title = document
            .title()
            .filter(|title| !title.is_empty())
            .ok_or_else(|| MinneError::transcript(url, "missing title metadata in video"))?
            .to_string();

        let length = document
            .length()
            .filter(|length| *length > 0.0)
            .ok_or_else(|| MinneError::transcript(url, "missing length metadata in video"))?;

        if length > self.max_video_seconds {
            return Err(MinneError::transcript(
                url,
                format!(
                    "video is {:.0} seconds long, please provide a video shorter than {:.0} seconds",
                    length, self.max_video_seconds
                ),
            ));
        }

        Ok((title, length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Document;

    struct NoopModel;

    #[async_trait::async_trait]
    impl CompletionModel for NoopModel {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Ok(String::new())
        }
    }

    fn summarizer() -> TranscriptSummarizer {
        TranscriptSummarizer::new(Arc::new(NoopModel), Prompts::default(), 2000.0, 1000)
    }

    const URL: &str = "https://youtube.com/watch?v=dQw4w9WgXcQ";

    fn video_doc(title: Option<&str>, length: Option<f64>) -> Document {
        let mut doc = Document::new("a transcript");
        if let Some(title) = title {
            doc = doc.with_metadata("title", title);
        }
        if let Some(length) = length {
            doc = doc.with_metadata("length", length);
        }
        doc
    }

    #[test]
    fn test_validate_accepts_complete_metadata() {
        let docs = vec![video_doc(Some("Intro to Cells"), Some(930.0))];
        let (title, length) = summarizer().validate(&docs, URL).unwrap();
        assert_eq!(title, "Intro to Cells");
        assert_eq!(length, 930.0);
    }

    #[test]
    fn test_validate_rejects_empty_document_list() {
        let err = summarizer().validate(&[], URL).unwrap_err();
        assert!(matches!(err, MinneError::VideoTranscript { .. }));
        assert!(err.to_string().contains(URL));
    }

    #[test]
    fn test_validate_rejects_missing_title() {
        let docs = vec![video_doc(None, Some(930.0))];
        let err = summarizer().validate(&docs, URL).unwrap_err();
        assert!(err.to_string().contains("missing title metadata"));

        let docs = vec![video_doc(Some(""), Some(930.0))];
        let err = summarizer().validate(&docs, URL).unwrap_err();
        assert!(err.to_string().contains("missing title metadata"));
    }

    #[test]
    fn test_validate_rejects_missing_length() {
        let docs = vec![video_doc(Some("Intro to Cells"), None)];
        let err = summarizer().validate(&docs, URL).unwrap_err();
        assert!(err.to_string().contains("missing length metadata"));

        let docs = vec![video_doc(Some("Intro to Cells"), Some(0.0))];
        let err = summarizer().validate(&docs, URL).unwrap_err();
        assert!(err.to_string().contains("missing length metadata"));
    }

    #[test]
    fn test_validate_rejects_video_over_ceiling() {
        let docs = vec![video_doc(Some("Intro to Cells"), Some(3000.0))];
        let err = summarizer().validate(&docs, URL).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("3000"));
        assert!(message.contains("2000"));
    }
}
