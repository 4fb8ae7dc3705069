//! The summarize command: the full link-to-summary pipeline.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::summarize::Strategy;
use crate::SammendragError;

pub async fn run_summarize(link: &str, method: &str, settings: Settings) -> Result<()> {
    let strategy: Strategy = method.parse().map_err(SammendragError::InvalidInput)?;

    preflight::check(Operation::Pipeline)?;

    let pipeline = Pipeline::new(settings)?;

    let spinner = Output::spinner(&format!("Generating {} summary...", strategy));
    let result = pipeline.run(link, strategy).await;
    spinner.finish_and_clear();

    let result = result?;

    Output::header(&format!("Summary ({})", strategy));
    println!("{}", result.summary);
    println!();
    Output::success(&format!("Saved to {}", result.summary_path.display()));
    Output::kv("transcript", &result.transcript_path.display().to_string());

    Ok(())
}
