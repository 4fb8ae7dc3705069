//! The facts command: key-fact extraction and fact checking.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::pipeline::Pipeline;

pub async fn run_facts(link: &str, check: bool, settings: Settings) -> Result<()> {
    preflight::check(Operation::Pipeline)?;

    let max_passes = settings.summarization.max_fact_check_passes;
    let pipeline = Pipeline::new(settings)?;

    let spinner = Output::spinner("Transcribing...");
    let transcribed = pipeline.transcribe_link(link).await;
    spinner.finish_and_clear();
    let (_, transcript_path) = transcribed?;

    if check {
        let spinner = Output::spinner("Summarizing and checking facts...");
        let summary = pipeline
            .summarizer()
            .check_facts(&transcript_path, max_passes)
            .await;
        spinner.finish_and_clear();

        Output::header("Checked summary");
        println!("{}", summary?);
    } else {
        let spinner = Output::spinner("Extracting facts...");
        let facts = pipeline.summarizer().extract_facts(&transcript_path).await;
        spinner.finish_and_clear();

        Output::header("Key facts");
        println!("{}", facts?);
    }

    Ok(())
}
