//! Configuration management for Sammendrag.

mod prompts;
mod settings;

pub use prompts::{FactPrompts, Prompts, RefinePrompts, SummaryPrompts};
pub use settings::{
    ExtractionSettings, GeneralSettings, PromptSettings, Settings, SummarizationSettings,
    TranscriptionSettings,
};
