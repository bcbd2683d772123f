//! Core data types for docingest.
//!
//! Documents flow through every stage of the pipeline: the walker
//! creates one per file, the chunker derives many smaller ones, and
//! the index stores them alongside their embedding vectors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Metadata key holding the originating file path
pub const SOURCE_KEY: &str = "source";

/// Arbitrary document metadata (ordered for stable serialization)
pub type Metadata = BTreeMap<String, Value>;

/// A unit of text plus the metadata describing where it came from.
///
/// Chunks are also `Document`s: they inherit their parent's metadata
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Extracted text content
    pub page_content: String,

    /// Metadata; always contains [`SOURCE_KEY`] for walked files
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    /// Create a document with empty metadata
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: Metadata::new(),
        }
    }

    /// Create a document tagged with its source file path
    pub fn from_source(page_content: impl Into<String>, source: &Path) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert(
            SOURCE_KEY.to_string(),
            Value::String(source.to_string_lossy().into_owned()),
        );
        Self {
            page_content: page_content.into(),
            metadata,
        }
    }

    /// Source path recorded in metadata, if any
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).and_then(Value::as_str)
    }

    /// Content length in characters (not bytes)
    pub fn char_len(&self) -> usize {
        self.page_content.chars().count()
    }
}

/// Nearest-neighbour hit returned by an index lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Distance in the index's space (lower = closer)
    pub distance: f32,

    /// The stored chunk
    pub document: Document,
}

/// Statistics from an ingestion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestStats {
    /// Number of files loaded by the walker
    pub files_loaded: usize,

    /// Number of chunks produced by the chunker
    pub chunks_created: usize,

    /// Number of chunks embedded and inserted into the index
    pub chunks_embedded: usize,

    /// Throttle wait predicted before embedding started, in seconds
    pub estimated_wait_secs: u64,

    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,

    /// Where the index was written (None for dry runs)
    pub index_dir: Option<PathBuf>,
}
