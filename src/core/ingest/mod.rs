//! Ingestion pipeline
//!
//! Walks a directory, extracts text, chunks it and feeds the chunks
//! through an embedder into a vector index.

pub mod builder;
pub mod chunker;
pub mod extractor;
pub mod pipeline;
pub mod walker;

pub use builder::IndexBuilder;
pub use chunker::Chunker;
pub use extractor::{ExtractorKind, HtmlExtractor, MarkdownExtractor, TextExtractor};
pub use pipeline::IngestPipeline;
pub use walker::DirectoryWalker;
