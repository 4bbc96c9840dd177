//! Configuration module for Minne.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{FlashcardPrompts, Prompts, SummarizePrompts};
pub use settings::{
    ChunkingSettings, GeneralSettings, LimitSettings, ModelSettings, PromptSettings, Settings,
};
