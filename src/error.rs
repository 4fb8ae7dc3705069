//! Error types for Sammendrag.

use thiserror::Error;

/// Library-level error type for Sammendrag operations.
#[derive(Error, Debug)]
pub enum SammendragError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not resolve media link: {0}")]
    Resolution(String),

    #[error("Audio download failed: {0}")]
    Download(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Summarization failed: {0}")]
    Summarization(String),

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

/// Result type alias for Sammendrag operations.
pub type Result<T> = std::result::Result<T, SammendragError>;
