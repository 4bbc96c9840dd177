//! PDF document loader.

use super::{Document, Loader};
use crate::error::{MinneError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loader for PDF files.
pub struct PdfLoader {
    files: Vec<PathBuf>,
}

impl PdfLoader {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    fn extract_text(path: &Path) -> Result<String> {
        pdf_extract::extract_text(path).map_err(|e| {
            MinneError::Loader(format!(
                "failed to extract text from {}: {}",
                path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl Loader for PdfLoader {
    async fn load(&self) -> Result<Vec<Document>> {
        let mut documents = Vec::with_capacity(self.files.len());

        for path in &self.files {
            let content = Self::extract_text(path)?;
            debug!("Extracted {} characters from {}", content.len(), path.display());

            documents.push(
                Document::new(content).with_metadata("source", path.display().to_string()),
            );
        }

        Ok(documents)
    }
}
