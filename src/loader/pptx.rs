//! PPTX document loader.
//!
//! Reads the OOXML slide parts in slide order and collects the text runs.

use super::{Document, Loader};
use crate::error::{MinneError, Result};
use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Loader for PPTX files.
pub struct PptxLoader {
    files: Vec<PathBuf>,
}

impl PptxLoader {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    fn extract_text(path: &Path) -> Result<String> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file).map_err(|e| {
            MinneError::Loader(format!(
                "failed to open {} as a pptx archive: {}",
                path.display(),
                e
            ))
        })?;

        let mut slide_names: Vec<String> = archive
            .file_names()
            .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
            .map(String::from)
            .collect();
        // "slide10.xml" must sort after "slide9.xml"
        slide_names.sort_by_key(|name| slide_number(name));

        if slide_names.is_empty() {
            return Err(MinneError::Loader(format!(
                "{} contains no slides",
                path.display()
            )));
        }

        let mut text = String::new();
        for name in &slide_names {
            let mut xml = String::new();
            archive
                .by_name(name)
                .map_err(|e| MinneError::Loader(format!("failed to read slide {}: {}", name, e)))?
                .read_to_string(&mut xml)?;

            text.push_str(&parse_slide_xml(&xml)?);
            text.push('\n');
        }

        Ok(text)
    }
}

fn slide_number(name: &str) -> u32 {
    name.trim_start_matches("ppt/slides/slide")
        .trim_end_matches(".xml")
        .parse()
        .unwrap_or(0)
}

/// Collect the text of every `a:t` run, one line per paragraph.
fn parse_slide_xml(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"a:t" => in_text_run = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"a:t" => in_text_run = false,
                b"a:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let value = t
                    .unescape()
                    .map_err(|e| MinneError::Loader(format!("invalid pptx text: {}", e)))?;
                text.push_str(&value);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(MinneError::Loader(format!("failed to parse pptx xml: {}", e)));
            }
            _ => {}
        }
    }

    Ok(text)
}

#[async_trait]
impl Loader for PptxLoader {
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn slide_xml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
       xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree><p:sp><p:txBody>
    <a:p><a:r><a:t>{}</a:t></a:r></a:p>
  </p:txBody></p:sp></p:spTree></p:cSld>
</p:sld>"#,
            body
        )
    }

    #[test]
    fn test_slide_number_ordering() {
        let mut names = vec![
            "ppt/slides/slide10.xml".to_string(),
            "ppt/slides/slide2.xml".to_string(),
            "ppt/slides/slide1.xml".to_string(),
        ];
        names.sort_by_key(|name| slide_number(name));
        assert_eq!(
            names,
            vec![
                "ppt/slides/slide1.xml".to_string(),
                "ppt/slides/slide2.xml".to_string(),
                "ppt/slides/slide10.xml".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_load_pptx_fixture_in_slide_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");

        let file = File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        // Write out of order on purpose
        zip.start_file("ppt/slides/slide2.xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(slide_xml("Second slide").as_bytes()).unwrap();
        zip.start_file("ppt/slides/slide1.xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(slide_xml("First slide").as_bytes()).unwrap();
        zip.finish().unwrap();

        let documents = PptxLoader::new(vec![path]).load().await.unwrap();
        assert_eq!(documents.len(), 1);

        let first = documents[0].content.find("First slide").unwrap();
        let second = documents[0].content.find("Second slide").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_load_rejects_archive_without_slides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pptx");

        let file = File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("docProps/app.xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<Properties/>").unwrap();
        zip.finish().unwrap();

        let err = PptxLoader::new(vec![path]).load().await.unwrap_err();
        assert!(err.to_string().contains("no slides"));
    }
}
