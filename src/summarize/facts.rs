//! Fact extraction and fact checking.
//!
//! Secondary operations on the same chunked transcript: a numbered list of
//! short factual statements, and an iterative check of a running summary
//! against the source text. Both are best-effort and sit outside the primary
//! strategy selection.

use super::{wrap_text, Summarizer};
use crate::error::Result;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, instrument};

impl Summarizer {
    /// Extract a numbered list of short factual statements from a transcript.
    #[instrument(skip(self), fields(transcript = %transcript_path.display()))]
    pub async fn extract_facts(&self, transcript_path: &Path) -> Result<String> {
        let chunks = self.load_and_split(transcript_path)?;
        info!("Extracting facts from {} chunk(s)", chunks.len());

        let joined = chunks.join("\n\n");
        let mut vars = HashMap::new();
        vars.insert("text".to_string(), joined);
        let prompt = self
            .prompts
            .render_with_custom(&self.prompts.facts.extract, &vars);

        let facts = self.llm.complete(&self.prompts.summary.system, &prompt).await?;
        Ok(wrap_text(facts.trim(), self.wrap_width))
    }

    /// Summarize a transcript, then verify the summary against the source
    /// chunks for up to `max_passes` correction passes.
    ///
    /// Stops early when a pass returns the summary unchanged. Note the
    /// verification draws only on the transcript itself; claims that are
    /// false in the world but said in the audio are kept.
    #[instrument(skip(self), fields(transcript = %transcript_path.display()))]
    pub async fn check_facts(&self, transcript_path: &Path, max_passes: usize) -> Result<String> {
        let chunks = self.load_and_split(transcript_path)?;
        let source = chunks.join("\n\n");

        let mut vars = HashMap::new();
        vars.insert("text".to_string(), source.clone());
        let prompt = self
            .prompts
            .render_with_custom(&self.prompts.summary.chunk, &vars);
        let mut summary = self.llm.complete(&self.prompts.summary.system, &prompt).await?;

        for pass in 1..=max_passes {
            let mut vars = HashMap::new();
            vars.insert("summary".to_string(), summary.clone());
            vars.insert("text".to_string(), source.clone());
            let prompt = self
                .prompts
                .render_with_custom(&self.prompts.facts.check, &vars);

            let corrected = self.llm.complete(&self.prompts.summary.system, &prompt).await?;
            let corrected = corrected.trim().to_string();

            if corrected == summary.trim() {
                debug!("Fact check converged after {} pass(es)", pass);
                break;
            }
            summary = corrected;
        }

        Ok(wrap_text(summary.trim(), self.wrap_width))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{Prompts, SummarizationSettings};
    use crate::error::{Result, SammendragError};
    use crate::llm::LlmClient;
    use crate::summarize::Summarizer;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    struct ScriptedLlm {
        responses: Mutex<Vec<String>>,
        calls: Mutex<usize>,
    }

    impl ScriptedLlm {
        fn new(responses: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.iter().rev().map(|s| s.to_string()).collect()),
                calls: Mutex::new(0),
            })
        }

        fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String> {
            *self.calls.lock().unwrap() += 1;
            self.responses
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| SammendragError::Summarization("No scripted response left".into()))
        }
    }

    fn summarizer(llm: Arc<dyn LlmClient>) -> Summarizer {
        Summarizer::new(llm, Prompts::default(), &SummarizationSettings::default())
    }

    fn write_transcript(dir: &Path, text: &str) -> PathBuf {
        let path = dir.join("Talk.txt");
        std::fs::write(&path, text).unwrap();
        path
    }

    #[tokio::test]
    async fn test_extract_facts_is_one_call() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = write_transcript(dir.path(), "the sky was discussed at length");
        let llm = ScriptedLlm::new(&["1. The sky was discussed."]);

        let facts = summarizer(llm.clone()).extract_facts(&transcript).await.unwrap();

        assert_eq!(facts, "1. The sky was discussed.");
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_check_facts_stops_when_converged() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = write_transcript(dir.path(), "talk about rust programming");
        // Initial summary, then a correction pass that changes nothing
        let llm = ScriptedLlm::new(&["rust talk summary", "rust talk summary"]);

        let summary = summarizer(llm.clone())
            .check_facts(&transcript, 2)
            .await
            .unwrap();

        assert_eq!(summary, "rust talk summary");
        // 1 summary call + 1 converged check pass, not 2
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_check_facts_bounded_passes() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = write_transcript(dir.path(), "talk about rust programming");
        // Every pass keeps changing the summary; must stop at the cap anyway
        let llm = ScriptedLlm::new(&["v1", "v2", "v3", "v4", "v5"]);

        let summary = summarizer(llm.clone())
            .check_facts(&transcript, 2)
            .await
            .unwrap();

        assert_eq!(summary, "v3");
        assert_eq!(llm.call_count(), 3);
    }
}
