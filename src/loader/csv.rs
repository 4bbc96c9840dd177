//! CSV document loader.

use super::{Document, Loader};
use crate::error::{MinneError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Loader for CSV files.
pub struct CsvLoader {
    files: Vec<PathBuf>,
}

impl CsvLoader {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    /// Render the header and every record as comma-joined lines.
    fn extract_text(path: &Path) -> Result<String> {
        let mut reader = ::csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| {
                MinneError::Loader(format!("failed to open {}: {}", path.display(), e))
            })?;

        let mut text = String::new();

        let headers = reader
            .headers()
            .map_err(|e| MinneError::Loader(format!("failed to read {}: {}", path.display(), e)))?
            .clone();
        if !headers.is_empty() {
            text.push_str(&headers.iter().collect::<Vec<_>>().join(", "));
            text.push('\n');
        }

        for record in reader.records() {
            let record = record.map_err(|e| {
                MinneError::Loader(format!("failed to read {}: {}", path.display(), e))
            })?;
            text.push_str(&record.iter().collect::<Vec<_>>().join(", "));
            text.push('\n');
        }

        Ok(text)
    }
}

#[async_trait]
impl Loader for CsvLoader {
    async fn load(&self) -> Result<Vec<Document>> {
        let mut documents = Vec::with_capacity(self.files.len());

        for path in &self.files {
            let content = Self::extract_text(path)?;
            documents.push(
                Document::new(content).with_metadata("source", path.display().to_string()),
            );
        }

        Ok(documents)
    }
}
