//! Sammendrag - Video Link Summarization
//!
//! A CLI tool that turns a video link into a readable summary.
//!
//! The name "Sammendrag" comes from the Norwegian word for "summary."
//!
//! # Overview
//!
//! Sammendrag allows you to:
//! - Download the audio track of a video from a link
//! - Transcribe it with a hosted speech-recognition model
//! - Summarize the transcript with one of three prompting strategies
//!   (map-reduce, stuffing, refine)
//! - Extract and verify key facts from the transcript
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `extract` - Audio extraction from media links
//! - `transcribe` - Speech-to-text transcription
//! - `llm` - Language model client abstraction
//! - `summarize` - Transcript chunking and summarization strategies
//! - `pipeline` - Stage coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use sammendrag::config::Settings;
//! use sammendrag::pipeline::Pipeline;
//! use sammendrag::summarize::Strategy;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = Pipeline::new(settings)?;
//!
//!     let result = pipeline
//!         .run("https://www.youtube.com/watch?v=dQw4w9WgXcQ", Strategy::MapReduce)
//!         .await?;
//!     println!("{}", result.summary);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod openai;
pub mod pipeline;
pub mod summarize;
pub mod transcribe;

pub use error::{Result, SammendragError};
