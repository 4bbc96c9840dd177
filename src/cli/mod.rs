//! CLI module for Minne.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Minne - Flashcard Generation
///
/// A local-first CLI tool for generating study flashcards from YouTube videos
/// and documents. The name "Minne" comes from the Norwegian word for "memory."
#[derive(Parser, Debug)]
#[command(name = "minne")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Minne and verify system requirements
    Init,

    /// Check system requirements and configuration
    Doctor,

    /// Generate flashcards from a video and/or documents
    Generate {
        /// Document files to process (pdf, docx, pptx, xlsx, csv)
        files: Vec<String>,

        /// YouTube video URL to summarize and generate from
        #[arg(short, long)]
        url: Option<String>,

        /// Maximum number of flashcards per source
        #[arg(short, long)]
        max_flashcards: Option<usize>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,

        /// Output format (text, json, csv)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "model.generation_model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
