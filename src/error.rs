//! Error types for Minne.

use thiserror::Error;

/// Library-level error type for Minne operations.
#[derive(Error, Debug)]
pub enum MinneError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Failed to load files: {0}")]
    Loader(String),

    #[error("Video transcript error for {url}: {reason}")]
    VideoTranscript { url: String, reason: String },

    #[error("Flashcard generation failed: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl MinneError {
    /// Build a transcript error tied to its source URL.
    pub fn transcript(url: impl Into<String>, reason: impl Into<String>) -> Self {
        MinneError::VideoTranscript {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for Minne operations.
pub type Result<T> = std::result::Result<T, MinneError>;
