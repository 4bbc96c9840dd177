//! DOCX document loader.
//!
//! Reads the OOXML `word/document.xml` part and collects the text runs.

use super::{Document, Loader};
use crate::error::{MinneError, Result};
use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Loader for DOCX files.
pub struct DocxLoader {
    files: Vec<PathBuf>,
}

impl DocxLoader {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    fn extract_text(path: &Path) -> Result<String> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file).map_err(|e| {
            MinneError::Loader(format!(
                "failed to open {} as a docx archive: {}",
                path.display(),
                e
            ))
        })?;

        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|e| {
                MinneError::Loader(format!(
                    "{} has no document body: {}",
                    path.display(),
                    e
                ))
            })?
            .read_to_string(&mut xml)?;

        parse_document_xml(&xml)
    }
}

/// Collect the text of every `w:t` run, one line per paragraph.
fn parse_document_xml(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let value = t
                    .unescape()
                    .map_err(|e| MinneError::Loader(format!("invalid docx text: {}", e)))?;
                text.push_str(&value);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(MinneError::Loader(format!("failed to parse docx xml: {}", e)));
            }
            _ => {}
        }
    }

    Ok(text)
}

#[async_trait]
impl Loader for DocxLoader {
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
