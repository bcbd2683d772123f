//! docingest - document ingestion for similarity search
//!
//! Loads every file under a directory, strips markup, splits the text
//! into overlapping chunks, embeds each chunk through an
//! OpenAI-compatible service and saves the vectors as a searchable
//! index.
//!
//! # Architecture
//!
//! - **core**: Domain logic
//!   - config, error, types, xdg
//!   - ingest (walker, extractors, chunker, builder, pipeline)
//!   - embedding (client trait, OpenAI client, throttle)
//!   - store (vector index, JSON persistence)
//!   - services (unified service container)
//!
//! - **cli**: Command-line front end (depends on core)
//!
//! # Key Features
//!
//! - Markdown and HTML text extraction
//! - Recursive character chunking (character-based, never panics)
//! - Rate-limited, strictly sequential embedding requests
//! - Index written once, only after every chunk is embedded

// Core domain logic
pub mod core;

// Command-line front end
pub mod cli;

// Re-export commonly used types for convenience
pub use crate::core::config::Config;
pub use crate::core::error::{IngestError, Result};
pub use crate::core::services::Services;
pub use crate::core::types::*;
pub use crate::core::{embedding, ingest, store};
