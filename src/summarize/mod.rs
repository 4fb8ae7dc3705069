//! Transcript summarization strategies.
//!
//! Three interchangeable strategies map an ordered chunk sequence to one
//! final summary string via calls to the language model:
//!
//! - `MapReduce` - summarize each chunk independently, then combine
//! - `Stuffing` - one call over the whole transcript
//! - `Refine` - sequentially update a running summary one chunk at a time
//!
//! All strategies request greedy decoding and wrap the final text at a fixed
//! column width for readability.

mod facts;
mod splitter;

pub use splitter::RecursiveCharacterSplitter;

use crate::config::{Prompts, SummarizationSettings};
use crate::error::{Result, SammendragError};
use crate::llm::LlmClient;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Summarization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Per-chunk summaries combined by a second model call.
    MapReduce,
    /// All chunks concatenated into a single prompt.
    Stuffing,
    /// Running summary revised chunk by chunk.
    Refine,
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mapreduce" | "map-reduce" | "map_reduce" => Ok(Strategy::MapReduce),
            "stuffing" | "stuff" => Ok(Strategy::Stuffing),
            "refine" => Ok(Strategy::Refine),
            _ => Err(format!(
                "Unknown summarization strategy: {} (expected MapReduce, Stuffing, or Refine)",
                s
            )),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::MapReduce => write!(f, "MapReduce"),
            Strategy::Stuffing => write!(f, "Stuffing"),
            Strategy::Refine => write!(f, "Refine"),
        }
    }
}

/// The final summary text plus the file it was persisted to.
#[derive(Debug, Clone)]
pub struct SummaryArtifact {
    pub text: String,
    pub path: PathBuf,
}

/// Summarizes transcripts against a language model.
pub struct Summarizer {
    llm: Arc<dyn LlmClient>,
    prompts: Prompts,
    splitter: RecursiveCharacterSplitter,
    wrap_width: usize,
    max_concurrent_calls: usize,
}

impl Summarizer {
    /// Create a summarizer from settings and prompt templates.
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Prompts, settings: &SummarizationSettings) -> Self {
        Self {
            llm,
            prompts,
            splitter: RecursiveCharacterSplitter::new(settings.chunk_size, settings.chunk_overlap),
            wrap_width: settings.wrap_width,
            max_concurrent_calls: settings.max_concurrent_calls.max(1),
        }
    }

    /// Read a transcript file and split it into ordered chunks.
    pub fn load_and_split(&self, transcript_path: &Path) -> Result<Vec<String>> {
        let text = std::fs::read_to_string(transcript_path)?;
        let chunks = self.splitter.split(&text);
        if chunks.is_empty() {
            return Err(SammendragError::Summarization(format!(
                "Transcript {} contains no text to summarize",
                transcript_path.display()
            )));
        }
        debug!("Split transcript into {} chunk(s)", chunks.len());
        Ok(chunks)
    }

    /// Summarize a transcript file with the selected strategy.
    ///
    /// Returns the word-wrapped summary and writes it to
    /// `summary_dir/{base_name}_{strategy}.txt`, overwriting any previous
    /// summary for the same (transcript, strategy) pair.
    #[instrument(skip(self, summary_dir), fields(transcript = %transcript_path.display(), strategy = %strategy))]
    pub async fn summarize(
        &self,
        transcript_path: &Path,
        strategy: Strategy,
        summary_dir: &Path,
    ) -> Result<SummaryArtifact> {
        let chunks = self.load_and_split(transcript_path)?;
        info!("Summarizing {} chunk(s) with {}", chunks.len(), strategy);

        let raw = match strategy {
            Strategy::MapReduce => self.map_reduce(&chunks).await?,
            Strategy::Stuffing => self.stuff(&chunks).await?,
            Strategy::Refine => self.refine(&chunks).await?,
        };

        let text = wrap_text(raw.trim(), self.wrap_width);

        let base_name = transcript_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                SammendragError::InvalidInput(format!(
                    "Transcript path {} has no usable file stem",
                    transcript_path.display()
                ))
            })?;

        std::fs::create_dir_all(summary_dir)?;
        let path = summary_dir.join(format!("{}_{}.txt", base_name, strategy));
        std::fs::write(&path, &text)?;
        info!("Wrote summary to {}", path.display());

        Ok(SummaryArtifact { text, path })
    }

    /// Map phase: summarize every chunk independently (bounded parallelism),
    /// fan results back in by chunk order. Reduce phase: one combine call.
    ///
    /// The reduce input is unbounded; if the joined per-chunk summaries
    /// exceed the model's context limit the combine call fails and the error
    /// propagates. No recursive re-reduction.
    async fn map_reduce(&self, chunks: &[String]) -> Result<String> {
        let mut partials: Vec<(usize, String)> = Vec::with_capacity(chunks.len());

        let mut calls = stream::iter(chunks.iter().enumerate())
            .map(|(idx, chunk)| async move {
                let summary = self.summarize_chunk(chunk).await;
                (idx, summary)
            })
            .buffer_unordered(self.max_concurrent_calls);

        while let Some((idx, result)) = calls.next().await {
            match result {
                Ok(summary) => partials.push((idx, summary)),
                Err(e) => {
                    return Err(SammendragError::Summarization(format!(
                        "Map call for chunk {} failed: {}",
                        idx, e
                    )))
                }
            }
        }
        drop(calls);

        partials.sort_by_key(|(idx, _)| *idx);
        let joined = partials
            .into_iter()
            .map(|(_, s)| s)
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = self.render_text_prompt(&self.prompts.summary.combine, &joined);
        self.llm.complete(&self.prompts.summary.system, &prompt).await
    }

    /// Stuffing: every chunk verbatim in a single prompt. No size guard; an
    /// oversized transcript fails at the model with a context-length error.
    async fn stuff(&self, chunks: &[String]) -> Result<String> {
        let joined = chunks.join("\n\n");
        let prompt = self.render_text_prompt(&self.prompts.summary.chunk, &joined);
        self.llm.complete(&self.prompts.summary.system, &prompt).await
    }

    /// Refine: initial summary from the first chunk, then one revision call
    /// per remaining chunk, strictly in order. The model is instructed to
    /// return the prior summary unchanged when a chunk adds nothing useful.
    async fn refine(&self, chunks: &[String]) -> Result<String> {
        let prompt = self.render_text_prompt(&self.prompts.refine.initial, &chunks[0]);
        let mut summary = self.llm.complete(&self.prompts.summary.system, &prompt).await?;

        for (idx, chunk) in chunks.iter().enumerate().skip(1) {
            debug!("Refining with chunk {}", idx);
            let mut vars = HashMap::new();
            vars.insert("existing_answer".to_string(), summary.clone());
            vars.insert("text".to_string(), chunk.clone());
            let prompt = self
                .prompts
                .render_with_custom(&self.prompts.refine.refine, &vars);
            summary = self.llm.complete(&self.prompts.summary.system, &prompt).await?;
        }

        Ok(summary)
    }

    async fn summarize_chunk(&self, chunk: &str) -> Result<String> {
        let prompt = self.render_text_prompt(&self.prompts.summary.chunk, chunk);
        self.llm.complete(&self.prompts.summary.system, &prompt).await
    }

    fn render_text_prompt(&self, template: &str, text: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("text".to_string(), text.to_string());
        self.prompts.render_with_custom(template, &vars)
    }
}

/// Wrap text at `width` columns for display.
///
/// Long words are never broken and existing whitespace is preserved; only
/// the space at each chosen break point becomes a newline. Existing line
/// breaks are kept as-is.
pub fn wrap_text(text: &str, width: usize) -> String {
    text.lines()
        .map(|line| wrap_line(line, width))
        .collect::<Vec<_>>()
        .join("\n")
}

fn wrap_line(line: &str, width: usize) -> String {
    if line.chars().count() <= width {
        return line.to_string();
    }

    let chars: Vec<char> = line.chars().collect();
    let mut out = String::new();
    let mut start = 0;

    while start < chars.len() {
        let remaining = chars.len() - start;
        if remaining <= width {
            out.extend(&chars[start..]);
            break;
        }

        // Break at the last space within the width, or the first space
        // after it if a single word overflows the width.
        let window_end = start + width;
        let break_at = (start..=window_end)
            .rev()
            .find(|&i| i > start && chars[i] == ' ')
            .or_else(|| (window_end..chars.len()).find(|&i| chars[i] == ' '));

        match break_at {
            Some(pos) => {
                out.extend(&chars[start..pos]);
                out.push('\n');
                start = pos + 1;
            }
            None => {
                out.extend(&chars[start..]);
                break;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SummarizationSettings;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted LLM fake: records prompts, replays canned responses.
    struct ScriptedLlm {
        responses: Mutex<Vec<String>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        fn new(responses: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.iter().rev().map(|s| s.to_string()).collect()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn recorded_prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn complete(&self, _system: &str, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| SammendragError::Summarization("No scripted response left".into()))
        }
    }

    /// Refine-faithful fake: echoes back the existing answer embedded in a
    /// refine prompt, as the real model is instructed to do for useless
    /// context.
    struct EchoRefineLlm;

    #[async_trait]
    impl LlmClient for EchoRefineLlm {
        async fn complete(&self, _system: &str, prompt: &str) -> Result<String> {
            if let Some(rest) = prompt.split("existing summary up to a certain point: ").nth(1) {
                let existing = rest.lines().next().unwrap_or("").to_string();
                return Ok(existing);
            }
            Ok("INITIAL".to_string())
        }
    }

    fn settings() -> SummarizationSettings {
        // Small enough that each test paragraph becomes its own chunk
        SummarizationSettings {
            chunk_size: 30,
            chunk_overlap: 10,
            max_concurrent_calls: 2,
            ..SummarizationSettings::default()
        }
    }

    fn summarizer(llm: Arc<dyn LlmClient>) -> Summarizer {
        Summarizer::new(llm, Prompts::default(), &settings())
    }

    fn write_transcript(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(format!("{}.txt", name));
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_strategy_parsing_is_exhaustive_and_exclusive() {
        assert_eq!("MapReduce".parse::<Strategy>().unwrap(), Strategy::MapReduce);
        assert_eq!("stuffing".parse::<Strategy>().unwrap(), Strategy::Stuffing);
        assert_eq!("Refine".parse::<Strategy>().unwrap(), Strategy::Refine);
        assert!("bullet-points".parse::<Strategy>().is_err());
        assert!("".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_strategy_display_names_used_in_artifacts() {
        assert_eq!(Strategy::MapReduce.to_string(), "MapReduce");
        assert_eq!(Strategy::Stuffing.to_string(), "Stuffing");
        assert_eq!(Strategy::Refine.to_string(), "Refine");
    }

    #[tokio::test]
    async fn test_stuffing_single_call_over_whole_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = write_transcript(dir.path(), "Episode", "short spoken content");
        let llm = ScriptedLlm::new(&["a stuffed summary"]);

        let result = summarizer(llm.clone())
            .summarize(&transcript, Strategy::Stuffing, dir.path())
            .await
            .unwrap();

        assert_eq!(result.text, "a stuffed summary");
        let prompts = llm.recorded_prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("short spoken content"));
    }

    #[tokio::test]
    async fn test_map_reduce_summarizes_each_chunk_then_combines() {
        let dir = tempfile::tempdir().unwrap();
        // Three paragraphs, each its own chunk at this chunk size
        let transcript = write_transcript(
            dir.path(),
            "Episode",
            "alpha part of the talk\n\nbeta part of the talk\n\ngamma part of the talk",
        );
        let llm = ScriptedLlm::new(&["sum-a", "sum-b", "sum-c", "combined summary"]);

        let result = summarizer(llm.clone())
            .summarize(&transcript, Strategy::MapReduce, dir.path())
            .await
            .unwrap();

        assert_eq!(result.text, "combined summary");
        let prompts = llm.recorded_prompts();
        assert_eq!(prompts.len(), 4);
        // Combine prompt carries the per-chunk summaries in chunk order
        let combine = prompts.last().unwrap();
        let pos_a = combine.find("sum-a");
        let pos_b = combine.find("sum-b");
        let pos_c = combine.find("sum-c");
        assert!(pos_a.is_some() && pos_b.is_some() && pos_c.is_some());
        assert!(pos_a < pos_b && pos_b < pos_c);
    }

    #[tokio::test]
    async fn test_refine_walks_chunks_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = write_transcript(
            dir.path(),
            "Episode",
            "alpha part of the talk\n\nbeta part of the talk\n\ngamma part of the talk",
        );
        let llm = ScriptedLlm::new(&["draft-1", "draft-2", "final draft"]);

        let result = summarizer(llm.clone())
            .summarize(&transcript, Strategy::Refine, dir.path())
            .await
            .unwrap();

        assert_eq!(result.text, "final draft");
        let prompts = llm.recorded_prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[1].contains("draft-1"));
        assert!(prompts[1].contains("beta part"));
        assert!(prompts[2].contains("draft-2"));
        assert!(prompts[2].contains("gamma part"));
    }

    #[tokio::test]
    async fn test_refine_keeps_summary_when_context_is_useless() {
        let dir = tempfile::tempdir().unwrap();
        // Second chunk is filler; a faithful model echoes the summary back
        let transcript = write_transcript(
            dir.path(),
            "Episode",
            "substantial first segment of talk\n\nuh um uh filler noise words",
        );

        let result = summarizer(Arc::new(EchoRefineLlm))
            .summarize(&transcript, Strategy::Refine, dir.path())
            .await
            .unwrap();

        assert_eq!(result.text, "INITIAL");
    }

    #[tokio::test]
    async fn test_single_chunk_transcript_uses_one_chunk_for_all_strategies() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = write_transcript(dir.path(), "Short", "brief remarks");

        for (strategy, responses, expected_calls) in [
            (Strategy::Stuffing, vec!["s"], 1),
            (Strategy::MapReduce, vec!["s", "combined"], 2),
            (Strategy::Refine, vec!["s"], 1),
        ] {
            let llm = ScriptedLlm::new(&responses);
            summarizer(llm.clone())
                .summarize(&transcript, strategy, dir.path())
                .await
                .unwrap();
            let prompts = llm.recorded_prompts();
            assert_eq!(prompts.len(), expected_calls, "strategy {}", strategy);
            assert!(prompts[0].contains("brief remarks"));
        }
    }

    #[tokio::test]
    async fn test_summary_file_naming_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = write_transcript(dir.path(), "My_Video", "some spoken words");

        let first = summarizer(ScriptedLlm::new(&["first summary"]))
            .summarize(&transcript, Strategy::Stuffing, dir.path())
            .await
            .unwrap();
        assert_eq!(first.path, dir.path().join("My_Video_Stuffing.txt"));

        let second = summarizer(ScriptedLlm::new(&["second summary"]))
            .summarize(&transcript, Strategy::Stuffing, dir.path())
            .await
            .unwrap();

        // Same path, overwritten content, no duplicate artifact
        assert_eq!(second.path, first.path);
        assert_eq!(std::fs::read_to_string(&second.path).unwrap(), "second summary");
        let summaries = std::fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().contains("_Stuffing"))
            .count();
        assert_eq!(summaries, 1);
    }

    #[tokio::test]
    async fn test_empty_transcript_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = write_transcript(dir.path(), "Empty", "");
        let result = summarizer(ScriptedLlm::new(&[]))
            .summarize(&transcript, Strategy::Stuffing, dir.path())
            .await;
        assert!(matches!(result, Err(SammendragError::Summarization(_))));
    }

    #[tokio::test]
    async fn test_model_failure_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = write_transcript(
            dir.path(),
            "Episode",
            "alpha part of the talk\n\nbeta part of the talk",
        );
        // Only one scripted response for a strategy needing three calls
        let result = summarizer(ScriptedLlm::new(&["only one"]))
            .summarize(&transcript, Strategy::MapReduce, dir.path())
            .await;
        assert!(result.is_err());
        assert!(!dir.path().join("Episode_MapReduce.txt").exists());
    }

    #[test]
    fn test_wrap_respects_width_without_breaking_words() {
        let text = "one two three four five six seven eight nine ten eleven twelve";
        let wrapped = wrap_text(text, 20);
        for line in wrapped.lines() {
            assert!(line.chars().count() <= 20, "line too long: {:?}", line);
        }
        assert_eq!(wrapped.replace('\n', " "), text);
    }

    #[test]
    fn test_wrap_keeps_long_words_intact() {
        let text = "short supercalifragilisticexpialidocious word";
        let wrapped = wrap_text(text, 10);
        assert!(wrapped.contains("supercalifragilisticexpialidocious"));
    }

    #[test]
    fn test_wrap_preserves_existing_newlines_and_spacing() {
        let text = "first line\nsecond  line with  double  spaces";
        let wrapped = wrap_text(text, 100);
        assert_eq!(wrapped, text);
    }
}
