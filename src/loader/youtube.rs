//! YouTube transcript loader.
//!
//! Fetches video metadata and captions through yt-dlp, producing one
//! document per video with `title` and `length` metadata attached when
//! the video exposes them.

use super::{Document, Loader};
use crate::error::{MinneError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::path::PathBuf;
use tracing::debug;

/// Loader turning YouTube URLs into transcript documents.
pub struct YoutubeTranscriptLoader {
    urls: Vec<String>,
    video_id_regex: Regex,
}

impl YoutubeTranscriptLoader {
    pub fn new(urls: Vec<String>) -> Self {
        // Matches various YouTube URL formats and bare video IDs
        let video_id_regex = Regex::new(
            r"(?x)
            (?:
                # Full YouTube URLs
                (?:https?://)?
                (?:www\.)?
                (?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/)
                ([a-zA-Z0-9_-]{11})
            )
            |
            # Bare video ID (11 characters)
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .expect("Invalid regex");

        Self {
            urls,
            video_id_regex,
        }
    }

    /// Extract video ID from a YouTube URL or bare ID.
    fn extract_video_id(&self, input: &str) -> Option<String> {
        let caps = self.video_id_regex.captures(input.trim())?;

        // Try group 1 (URL format) then group 2 (bare ID)
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    }

    /// Canonical watch URL for yt-dlp.
    ///
    /// Bare video IDs and scheme-less inputs are rebuilt into a full
    /// watch URL; well-formed URLs pass through untouched.
    fn watch_url(&self, input: &str) -> Result<String> {
        let video_id = self.extract_video_id(input).ok_or_else(|| {
            MinneError::InvalidInput(format!("Invalid YouTube video ID or URL: {}", input))
        })?;

        if url::Url::parse(input).is_ok() {
            Ok(input.trim().to_string())
        } else {
            Ok(format!("https://www.youtube.com/watch?v={}", video_id))
        }
    }

    /// Fetch title and duration using yt-dlp.
    async fn fetch_metadata(&self, url: &str) -> Result<(Option<String>, Option<f64>)> {
        let output = tokio::process::Command::new("yt-dlp")
            .args(["--dump-json", "--no-download", "--no-warnings", url])
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    MinneError::ToolNotFound("yt-dlp".to_string())
                } else {
                    MinneError::Loader(format!("failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MinneError::Loader(format!(
                "video {} not found or unavailable: {}",
                url, stderr
            )));
        }

        let json_str = String::from_utf8_lossy(&output.stdout);
        let json: serde_json::Value = serde_json::from_str(&json_str)
            .map_err(|e| MinneError::Loader(format!("failed to parse yt-dlp output: {}", e)))?;

        let title = json["title"].as_str().map(|s| s.to_string());
        let duration = json["duration"].as_f64();

        Ok((title, duration))
    }

    /// Download English captions into a temp dir and flatten them to text.
    async fn fetch_transcript(&self, url: &str) -> Result<String> {
        let dir = tempfile::tempdir()?;
        let template = dir.path().join("transcript");

        let output = tokio::process::Command::new("yt-dlp")
            .args([
                "--skip-download",
                "--write-subs",
                "--write-auto-subs",
                "--sub-langs",
                "en.*,en",
                "--sub-format",
                "json3",
                "--no-warnings",
                "-o",
            ])
            .arg(&template)
            .arg(url)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    MinneError::ToolNotFound("yt-dlp".to_string())
                } else {
                    MinneError::Loader(format!("failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MinneError::Loader(format!(
                "failed to fetch captions for {}: {}",
                url, stderr
            )));
        }

        let caption_path = find_caption_file(dir.path())?.ok_or_else(|| {
            MinneError::Loader(format!("no English captions available for {}", url))
        })?;

        debug!("Parsing captions from {}", caption_path.display());
        let raw = std::fs::read_to_string(&caption_path)?;
        parse_json3_captions(&raw)
    }
}

/// Find the caption file yt-dlp wrote, whatever language suffix it chose.
fn find_caption_file(dir: &std::path::Path) -> Result<Option<PathBuf>> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(".json3"))
        {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

/// Flatten a json3 caption payload into whitespace-normalized text.
fn parse_json3_captions(raw: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| MinneError::Loader(format!("malformed caption file: {}", e)))?;

    let events = value["events"]
        .as_array()
        .ok_or_else(|| MinneError::Loader("malformed caption file: no events".to_string()))?;

    let mut text = String::new();
    for event in events {
        if let Some(segs) = event["segs"].as_array() {
            for seg in segs {
                if let Some(piece) = seg["utf8"].as_str() {
                    text.push_str(piece);
                    text.push(' ');
                }
            }
        }
    }

    Ok(text.split_whitespace().collect::<Vec<_>>().join(" "))
}

#[async_trait]
impl Loader for YoutubeTranscriptLoader {
    async fn load(&self) -> Result<Vec<Document>> {
        let mut documents = Vec::with_capacity(self.urls.len());

        for input in &self.urls {
            let url = self.watch_url(input)?;

            let (title, duration) = self.fetch_metadata(&url).await?;
            let transcript = self.fetch_transcript(&url).await?;

            let mut document = Document::new(transcript).with_metadata("source", url.clone());
            if let Some(title) = title {
                document = document.with_metadata("title", title);
            }
            if let Some(duration) = duration {
                document = document.with_metadata("length", duration);
            }

            documents.push(document);
        }

        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id() {
        let loader = YoutubeTranscriptLoader::new(Vec::new());

        // Test various URL formats
        assert_eq!(
            loader.extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            loader.extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            loader.extract_video_id("https://youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            loader.extract_video_id("dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );

        // Test invalid inputs
        assert_eq!(loader.extract_video_id("not-a-video-id"), None);
        assert_eq!(loader.extract_video_id(""), None);
    }

    #[test]
    fn test_watch_url_rebuilds_bare_ids() {
        let loader = YoutubeTranscriptLoader::new(Vec::new());

        assert_eq!(
            loader.watch_url("dQw4w9WgXcQ").unwrap(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(
            loader
                .watch_url("https://youtu.be/dQw4w9WgXcQ")
                .unwrap(),
            "https://youtu.be/dQw4w9WgXcQ"
        );

        let err = loader.watch_url("not-a-video-id").unwrap_err();
        assert!(matches!(err, MinneError::InvalidInput(_)));
    }

    #[test]
    fn test_parse_json3_captions() {
        let raw = r#"{
            "events": [
                {"tStartMs": 0, "segs": [{"utf8": "welcome to the"}, {"utf8": " lecture\n"}]},
                {"tStartMs": 2000},
                {"tStartMs": 4000, "segs": [{"utf8": "on cell biology"}]}
            ]
        }"#;

        let text = parse_json3_captions(raw).unwrap();
        assert_eq!(text, "welcome to the lecture on cell biology");
    }

    #[test]
    fn test_parse_json3_without_events_is_error() {
        let err = parse_json3_captions(r#"{"wireMagic": "pb3"}"#).unwrap_err();
        assert!(matches!(err, MinneError::Loader(_)));
    }
}
