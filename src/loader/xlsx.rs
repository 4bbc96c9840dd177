//! XLSX document loader.

use super::{Document, Loader};
use crate::error::{MinneError, Result};
use async_trait::async_trait;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loader for XLSX spreadsheets.
pub struct XlsxLoader {
    files: Vec<PathBuf>,
}

impl XlsxLoader {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    /// Render every sheet as lines of space-joined cell values.
    fn extract_text(path: &Path) -> Result<String> {
        let mut workbook = open_workbook_auto(path).map_err(|e| {
            MinneError::Loader(format!(
                "failed to open {} as a workbook: {}",
                path.display(),
                e
            ))
        })?;

        let mut text = String::new();
        for sheet in workbook.sheet_names().to_vec() {
            let range = workbook.worksheet_range(&sheet).map_err(|e| {
                MinneError::Loader(format!("failed to read sheet {}: {}", sheet, e))
            })?;

            debug!("Sheet '{}' has {} rows", sheet, range.height());

            for row in range.rows() {
                let cells: Vec<String> = row
                    .iter()
                    .filter(|cell| !matches!(cell, Data::Empty))
                    .map(|cell| cell.to_string())
                    .collect();

                if !cells.is_empty() {
                    text.push_str(&cells.join(" "));
                    text.push('\n');
                }
            }
        }

        Ok(text)
    }
}

#[async_trait]
impl Loader for XlsxLoader {
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
