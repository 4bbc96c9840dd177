//! Minne - Flashcard Generation
//!
//! A local-first CLI tool for generating study flashcards from YouTube videos
//! and documents.
//!
//! The name "Minne" comes from the Norwegian word for "memory."
//!
//! # Overview
//!
//! Minne allows you to:
//! - Summarize a YouTube video's transcript and turn it into flashcards
//! - Generate flashcards from PDF, DOCX, PPTX, XLSX, and CSV documents
//! - Cap, validate, and sanitize the generated concept/definition pairs
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt template management
//! - `loader` - Source loading (documents, YouTube transcripts)
//! - `splitter` - Text chunking for model-input-size management
//! - `model` - Completion model access
//! - `summarizer` - Transcript summarization
//! - `generator` - Flashcard generation from summaries and documents
//! - `executor` - Pipeline coordination
//! - `flashcard` - Flashcard records and model-output parsing
//!
//! # Example
//!
//! ```rust,no_run
//! use minne::config::Settings;
//! use minne::executor::{Executor, GenerateRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let executor = Executor::new(settings)?;
//!
//!     let request = GenerateRequest {
//!         youtube_url: Some("https://youtube.com/watch?v=dQw4w9WgXcQ".to_string()),
//!         files: vec!["lecture.pdf".to_string()],
//!         max_flashcards: Some(10),
//!     };
//!
//!     let flashcards = executor.run(&request).await?;
//!     println!("Generated {} flashcards", flashcards.len());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod flashcard;
pub mod generator;
pub mod loader;
pub mod model;
pub mod openai;
pub mod splitter;
pub mod summarizer;

pub use error::{MinneError, Result};
pub use executor::{Executor, GenerateRequest};
pub use flashcard::Flashcard;
