//! Stage coordination: extract, transcribe, summarize.
//!
//! The pipeline is strictly linear; each stage runs to completion before the
//! next begins, and the first error aborts the whole run.

use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::extract::{extract, AudioArtifact};
use crate::llm::{LlmClient, OpenAiLlm};
use crate::summarize::{Strategy, Summarizer};
use crate::transcribe::{transcribe_to_file, SpeechToText, WhisperSpeechToText};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

/// The pipeline context: settings plus the two hosted-service seams.
///
/// Services are explicitly constructed and passed in so tests can substitute
/// fakes for speech recognition and the language model.
pub struct Pipeline {
    settings: Settings,
    stt: Arc<dyn SpeechToText>,
    summarizer: Summarizer,
}

/// Result of one full pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Sanitized stem shared by all artifacts of this run.
    pub base_name: String,
    /// Where the transcript was written.
    pub transcript_path: PathBuf,
    /// The word-wrapped summary text.
    pub summary: String,
    /// Where the summary was written.
    pub summary_path: PathBuf,
}

impl Pipeline {
    /// Create a pipeline backed by the hosted services.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let stt: Arc<dyn SpeechToText> =
            Arc::new(WhisperSpeechToText::new(&settings.transcription.model));
        let llm: Arc<dyn LlmClient> = Arc::new(OpenAiLlm::new(&settings.summarization.model));

        Ok(Self::with_components(settings, prompts, stt, llm))
    }

    /// Create a pipeline with custom service implementations.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        stt: Arc<dyn SpeechToText>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        let summarizer = Summarizer::new(llm, prompts, &settings.summarization);
        Self {
            settings,
            stt,
            summarizer,
        }
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get the summarizer (for the secondary fact operations).
    pub fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    /// Extract audio and transcribe it, returning the artifacts.
    #[instrument(skip(self), fields(link = %link))]
    pub async fn transcribe_link(&self, link: &str) -> Result<(AudioArtifact, PathBuf)> {
        let audio = extract(
            link,
            &self.settings.sound_dir(),
            &self.settings.extraction.audio_format,
        )
        .await?;
        info!("Extracted audio for {}", audio.base_name);

        let transcript_path =
            transcribe_to_file(self.stt.as_ref(), &audio, &self.settings.transcript_dir()).await?;

        Ok((audio, transcript_path))
    }

    /// Run the full pipeline on one link with one strategy.
    #[instrument(skip(self), fields(link = %link, strategy = %strategy))]
    pub async fn run(&self, link: &str, strategy: Strategy) -> Result<PipelineResult> {
        let (audio, transcript_path) = self.transcribe_link(link).await?;

        let summary = self
            .summarizer
            .summarize(&transcript_path, strategy, &self.settings.summary_dir())
            .await?;

        Ok(PipelineResult {
            base_name: audio.base_name,
            transcript_path,
            summary: summary.text,
            summary_path: summary.path,
        })
    }
}
