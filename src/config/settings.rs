//! Configuration settings for Minne.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub model: ModelSettings,
    pub limits: LimitSettings,
    pub chunking: ChunkingSettings,
    pub prompts: PromptSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Directory for temporary files.
    pub temp_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.minne".to_string(),
            temp_dir: "/tmp/minne".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Model used for flashcard generation.
    pub generation_model: String,
    /// Model used for transcript summarization.
    pub summary_model: String,
    /// Sampling temperature for both models.
    pub temperature: f32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            generation_model: "gpt-4o-mini".to_string(),
            summary_model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
        }
    }
}

/// Limits on input size and output volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitSettings {
    /// Maximum video duration to summarize (in seconds).
    pub max_video_seconds: f64,
    /// Default number of flashcards to generate.
    pub max_flashcards: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_video_seconds: 2000.0,
            max_flashcards: 10,
        }
    }
}

/// Text chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Chunk size (in characters) for document flashcard generation.
    pub file_chunk_size: usize,
    /// Overlap (in characters) between adjacent document chunks.
    pub file_chunk_overlap: usize,
    /// Chunk size (in characters) for transcript normalization.
    pub transcript_chunk_size: usize,
    /// Number of chunks sent to the model per generation call.
    pub batch_size: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            file_chunk_size: 1000,
            file_chunk_overlap: 100,
            transcript_chunk_size: 1000,
            batch_size: 30,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}


impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::MinneError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("minne")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_constants() {
        let settings = Settings::default();
        assert_eq!(settings.limits.max_video_seconds, 2000.0);
        assert_eq!(settings.limits.max_flashcards, 10);
        assert_eq!(settings.chunking.file_chunk_size, 1000);
        assert_eq!(settings.chunking.file_chunk_overlap, 100);
        assert_eq!(settings.chunking.batch_size, 30);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [limits]
            max_flashcards = 25
            "#,
        )
        .unwrap();

        assert_eq!(settings.limits.max_flashcards, 25);
        assert_eq!(settings.limits.max_video_seconds, 2000.0);
        assert_eq!(settings.model.generation_model, "gpt-4o-mini");
    }
}
