//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a
//! specific subcommand.

pub mod completions;
pub mod config;
pub mod ingest;
pub mod search;

// Re-export argument types for use in mod.rs
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use ingest::IngestArgs;
pub use search::SearchArgs;
