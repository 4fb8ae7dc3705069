//! The doctor command: verify tools and configuration.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::openai::is_api_key_configured;

pub fn run_doctor(settings: &Settings) -> Result<()> {
    Output::header("Sammendrag doctor");

    if is_api_key_configured() {
        Output::success("OPENAI_API_KEY is set");
    } else {
        Output::error("OPENAI_API_KEY is not set");
    }

    match preflight::check(Operation::Pipeline) {
        Ok(()) => Output::success("yt-dlp is available"),
        Err(e) => Output::error(&e.to_string()),
    }

    Output::header("Artifact directories");
    Output::kv("sound", &settings.sound_dir().display().to_string());
    Output::kv("transcripts", &settings.transcript_dir().display().to_string());
    Output::kv("summaries", &settings.summary_dir().display().to_string());

    Output::header("Models");
    Output::kv("transcription", &settings.transcription.model);
    Output::kv("summarization", &settings.summarization.model);

    Ok(())
}
