//! Command implementations for the CLI.

mod config;
mod doctor;
mod facts;
mod summarize;

pub use config::run_config;
pub use doctor::run_doctor;
pub use facts::run_facts;
pub use summarize::run_summarize;
