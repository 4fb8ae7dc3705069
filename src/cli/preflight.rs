//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and the API credential are available
//! before starting a pipeline that would otherwise fail midway.

use crate::error::{Result, SammendragError};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// The full pipeline requires yt-dlp and the API key.
    Pipeline,
    /// Summarizing an existing transcript requires only the API key.
    SummarizeOnly,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Pipeline => {
            check_api_key()?;
            check_tool("yt-dlp")?;
        }
        Operation::SummarizeOnly => {
            check_api_key()?;
        }
    }
    Ok(())
}

/// Check if the OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(SammendragError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(SammendragError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(SammendragError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SammendragError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(SammendragError::ToolNotFound(format!("{}: {}", name, e))),
    }
}
