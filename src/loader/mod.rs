//! Source loading for Minne.
//!
//! Provides a trait-based interface over the supported input kinds
//! (documents on disk, YouTube videos) that turns each into normalized
//! text documents.

mod csv;
mod docx;
mod pdf;
mod pptx;
mod xlsx;
mod youtube;

pub use self::csv::CsvLoader;
pub use docx::DocxLoader;
pub use pdf::PdfLoader;
pub use pptx::PptxLoader;
pub use xlsx::XlsxLoader;
pub use youtube::YoutubeTranscriptLoader;

use crate::error::{MinneError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

/// A normalized text document produced by a loader.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Extracted text content.
    pub content: String,
    /// Loader-specific metadata (title, length, source).
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Document {
    /// Create a new document with empty metadata.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Title metadata, if the loader provided one.
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(|v| v.as_str())
    }

    /// Length metadata in seconds, if the loader provided one.
    pub fn length(&self) -> Option<f64> {
        self.metadata.get("length").and_then(|v| v.as_f64())
    }
}

/// Kind of input source, determined from the filename or URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Docx,
    Pptx,
    Csv,
    Xlsx,
    YouTube,
}

impl SourceKind {
    /// Detect the source kind for an input descriptor.
    ///
    /// Matching is case-insensitive on the filename; an unrecognized
    /// input is an `UnsupportedType` error naming it.
    pub fn detect(input: &str) -> Result<Self> {
        let lower = input.to_lowercase();

        if lower.ends_with(".pdf") {
            Ok(SourceKind::Pdf)
        } else if lower.ends_with(".docx") {
            Ok(SourceKind::Docx)
        } else if lower.ends_with(".pptx") {
            Ok(SourceKind::Pptx)
        } else if lower.ends_with(".csv") {
            Ok(SourceKind::Csv)
        } else if lower.ends_with(".xlsx") {
            Ok(SourceKind::Xlsx)
        } else if lower.contains("youtube.com") {
            Ok(SourceKind::YouTube)
        } else {
            Err(MinneError::UnsupportedType(input.to_string()))
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Pdf => write!(f, "pdf"),
            SourceKind::Docx => write!(f, "docx"),
            SourceKind::Pptx => write!(f, "pptx"),
            SourceKind::Csv => write!(f, "csv"),
            SourceKind::Xlsx => write!(f, "xlsx"),
            SourceKind::YouTube => write!(f, "youtube"),
        }
    }
}

/// Trait for source loaders.
#[async_trait]
pub trait Loader: Send + Sync {
    /// Load all inputs into normalized documents.
    ///
    /// Implementations must fail on unreadable or corrupt input rather
    /// than returning partial text silently.
    async fn load(&self) -> Result<Vec<Document>>;
}

/// Create the loader responsible for the given source kind.
pub fn create_loader(kind: SourceKind, inputs: &[String]) -> Box<dyn Loader> {
    match kind {
        SourceKind::Pdf => Box::new(PdfLoader::new(to_paths(inputs))),
        SourceKind::Docx => Box::new(DocxLoader::new(to_paths(inputs))),
        SourceKind::Pptx => Box::new(PptxLoader::new(to_paths(inputs))),
        SourceKind::Csv => Box::new(CsvLoader::new(to_paths(inputs))),
        SourceKind::Xlsx => Box::new(XlsxLoader::new(to_paths(inputs))),
        SourceKind::YouTube => Box::new(YoutubeTranscriptLoader::new(inputs.to_vec())),
    }
}

fn to_paths(inputs: &[String]) -> Vec<PathBuf> {
    inputs
        .iter()
        .map(|input| PathBuf::from(shellexpand::tilde(input).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_is_case_insensitive() {
        assert_eq!(SourceKind::detect("lecture.PDF").unwrap(), SourceKind::Pdf);
        assert_eq!(SourceKind::detect("notes.DocX").unwrap(), SourceKind::Docx);
        assert_eq!(SourceKind::detect("deck.pptx").unwrap(), SourceKind::Pptx);
        assert_eq!(SourceKind::detect("data.csv").unwrap(), SourceKind::Csv);
        assert_eq!(SourceKind::detect("sheet.XLSX").unwrap(), SourceKind::Xlsx);
    }

    #[test]
    fn test_detect_youtube_url() {
        assert_eq!(
            SourceKind::detect("https://youtube.com/watch?v=x").unwrap(),
            SourceKind::YouTube
        );
        assert_eq!(
            SourceKind::detect("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            SourceKind::YouTube
        );
    }

    #[test]
    fn test_detect_unsupported_names_the_input() {
        let err = SourceKind::detect("notes.txt").unwrap_err();
        assert!(matches!(err, MinneError::UnsupportedType(_)));
        assert!(err.to_string().contains("notes.txt"));
    }

    #[test]
    fn test_document_metadata_accessors() {
        let doc = Document::new("transcript text")
            .with_metadata("title", "Intro to Cells")
            .with_metadata("length", 930.0);

        assert_eq!(doc.title(), Some("Intro to Cells"));
        assert_eq!(doc.length(), Some(930.0));

        let bare = Document::new("no metadata");
        assert!(bare.title().is_none());
        assert!(bare.length().is_none());
    }
}
