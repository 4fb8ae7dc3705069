//! Configuration settings for Sammendrag.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub extraction: ExtractionSettings,
    pub transcription: TranscriptionSettings,
    pub summarization: SummarizationSettings,
    pub prompts: PromptSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Working directory under which the artifact directories live.
    pub work_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            work_dir: ".".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Audio extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    /// Directory (under work_dir) for extracted audio files.
    pub sound_dir: String,
    /// Audio container extension forced on downloaded files.
    pub audio_format: String,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            sound_dir: "sound_data".to_string(),
            audio_format: "mp3".to_string(),
        }
    }
}

/// Transcription service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Speech-recognition model to use.
    pub model: String,
    /// Directory (under work_dir) for transcript files.
    pub transcript_dir: String,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_string(),
            transcript_dir: "transcript_data".to_string(),
        }
    }
}

/// Summarization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizationSettings {
    /// LLM model for summarization calls.
    pub model: String,
    /// Directory (under work_dir) for summary files.
    pub summary_dir: String,
    /// Target chunk size in characters for transcript splitting.
    pub chunk_size: usize,
    /// Overlap in characters between consecutive chunks.
    pub chunk_overlap: usize,
    /// Column width for wrapping the final summary.
    pub wrap_width: usize,
    /// Maximum concurrent map-phase calls (MapReduce only).
    pub max_concurrent_calls: usize,
    /// Maximum correction passes for fact checking.
    pub max_fact_check_passes: usize,
}

impl Default for SummarizationSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            summary_dir: "summary_data".to_string(),
            chunk_size: 10_000,
            chunk_overlap: 100,
            wrap_width: 100,
            max_concurrent_calls: 3,
            max_fact_check_passes: 2,
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
            .map_err(|e| crate::error::SammendragError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sammendrag")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded working directory path.
    pub fn work_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.work_dir)
    }

    /// Directory for extracted audio files.
    pub fn sound_dir(&self) -> PathBuf {
        self.work_dir().join(&self.extraction.sound_dir)
    }

    /// Directory for transcript files.
    pub fn transcript_dir(&self) -> PathBuf {
        self.work_dir().join(&self.transcription.transcript_dir)
    }

    /// Directory for summary files.
    pub fn summary_dir(&self) -> PathBuf {
        self.work_dir().join(&self.summarization.summary_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_artifact_layout() {
        let settings = Settings::default();
        assert_eq!(settings.sound_dir(), PathBuf::from("./sound_data"));
        assert_eq!(settings.transcript_dir(), PathBuf::from("./transcript_data"));
        assert_eq!(settings.summary_dir(), PathBuf::from("./summary_data"));
        assert_eq!(settings.summarization.chunk_size, 10_000);
        assert_eq!(settings.summarization.chunk_overlap, 100);
    }

    #[test]
    fn test_roundtrip_toml() {
        let settings = Settings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed.summarization.model, settings.summarization.model);
        assert_eq!(parsed.extraction.audio_format, "mp3");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Settings = toml::from_str(
            r#"
            [summarization]
            model = "gpt-4.1"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.summarization.model, "gpt-4.1");
        assert_eq!(parsed.summarization.chunk_size, 10_000);
        assert_eq!(parsed.transcription.model, "whisper-1");
    }
}
