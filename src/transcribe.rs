//! Speech-to-text transcription.
//!
//! The hosted model handles the audio internally; only the flattened text is
//! kept. No language override, no timestamps.

use crate::error::{Result, SammendragError};
use crate::extract::AudioArtifact;
use crate::openai::create_client;
use async_openai::types::{AudioResponseFormat, CreateTranscriptionRequestArgs};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Trait for speech-to-text implementations.
///
/// A seam so the pipeline and tests can substitute fakes for the hosted
/// speech-recognition service.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe an audio file to plain text.
    async fn transcribe(&self, audio_path: &Path) -> Result<String>;
}

/// Hosted Whisper-based speech-to-text.
pub struct WhisperSpeechToText {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl WhisperSpeechToText {
    /// Create a transcriber for the given model (e.g. "whisper-1").
    pub fn new(model: &str) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl SpeechToText for WhisperSpeechToText {
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        debug!("Transcribing audio file with {}", self.model);

        let file_bytes = tokio::fs::read(audio_path).await?;

        let request = CreateTranscriptionRequestArgs::default()
            .file(async_openai::types::AudioInput::from_vec_u8(
                audio_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("audio.mp3")
                    .to_string(),
                file_bytes,
            ))
            .model(&self.model)
            .response_format(AudioResponseFormat::Json)
            .build()
            .map_err(|e| SammendragError::Transcription(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| SammendragError::OpenAI(format!("Whisper API error: {}", e)))?;

        Ok(response.text.trim().to_string())
    }
}

/// Transcribe an audio artifact and persist the text.
///
/// Writes the transcript to `transcript_dir/{base_name}.txt`, overwriting any
/// existing file of the same name, and returns that path.
#[instrument(skip(stt, transcript_dir), fields(base_name = %audio.base_name))]
pub async fn transcribe_to_file(
    stt: &dyn SpeechToText,
    audio: &AudioArtifact,
    transcript_dir: &Path,
) -> Result<PathBuf> {
    std::fs::create_dir_all(transcript_dir)?;

    let text = stt.transcribe(&audio.path).await?;

    let transcript_path = transcript_dir.join(format!("{}.txt", audio.base_name));
    tokio::fs::write(&transcript_path, &text).await?;

    info!(
        "Wrote transcript ({} chars) to {}",
        text.len(),
        transcript_path.display()
    );
    Ok(transcript_path)
}
