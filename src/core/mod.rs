//! Core domain logic
//!
//! Everything the ingest and search commands need, independent of the
//! command-line front end.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Documents and run statistics
//! - **xdg**: XDG directory handling
//! - **ingest**: Walker, extractors, chunker, index builder, pipeline
//! - **embedding**: Embedding client trait, OpenAI client, throttling
//! - **store**: Vector index trait and the flat on-disk index
//! - **services**: Unified service container

pub mod config;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod services;
pub mod store;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{IngestError, Result};
pub use services::Services;
