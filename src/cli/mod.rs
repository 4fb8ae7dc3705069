//! CLI module for Sammendrag.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Sammendrag - Video Link Summarization
///
/// A CLI tool that turns a video link into a readable summary.
/// The name "Sammendrag" comes from the Norwegian word for "summary."
#[derive(Parser, Debug)]
#[command(name = "sammendrag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download, transcribe, and summarize a video link
    Summarize {
        /// Video/audio link
        link: String,

        /// Summarization method: MapReduce, Stuffing, or Refine
        #[arg(short, long, default_value = "MapReduce")]
        method: String,
    },

    /// Extract key facts from a video link
    Facts {
        /// Video/audio link
        link: String,

        /// Verify a generated summary against the transcript instead of
        /// listing facts
        #[arg(long)]
        check: bool,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration file
    Init,
}
