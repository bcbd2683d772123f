//! Ingestion pipeline orchestration.
//!
//! Coordinates the end-to-end workflow:
//! 1. Walk the directory tree and extract text
//! 2. Chunk the documents
//! 3. Embed and insert every chunk (throttled)
//! 4. Save the index once

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::core::config::Config;
use crate::core::embedding::{Embedder, RateLimit, Throttle};
use crate::core::error::{IngestError, Result};
use crate::core::ingest::{Chunker, DirectoryWalker, IndexBuilder, TextExtractor};
use crate::core::store::{FlatIndex, Space, VectorIndex};
use crate::core::types::{Document, IngestStats};

/// Orchestrates a single ingestion run
pub struct IngestPipeline {
    root_dir: PathBuf,
    index_dir: PathBuf,
    space: Space,
    walker: Arc<DirectoryWalker>,
    extractor: Arc<dyn TextExtractor>,
    chunker: Chunker,
    rate_limit: RateLimit,
}

impl IngestPipeline {
    /// Create a pipeline from configuration
    ///
    /// # Returns
    ///
    /// A new `IngestPipeline`, or a configuration error for invalid
    /// patterns or chunking parameters
    pub fn from_config(config: &Config) -> Result<Self> {
        let walker = DirectoryWalker::new(
            config.input.include_patterns.clone(),
            config.input.exclude_patterns.clone(),
        )?;
        let chunker = Chunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap)?;

        Ok(Self {
            root_dir: config.input.root_dir.clone(),
            index_dir: config.output.index_dir.clone(),
            space: config.output.space,
            walker: Arc::new(walker),
            extractor: Arc::from(config.input.extractor.build()),
            chunker,
            rate_limit: config.rate_limit.clone(),
        })
    }

    /// Walk the root directory and extract every file's text
    ///
    /// The walk and file reads run on the blocking thread pool.
    pub async fn load_documents(&self) -> Result<Vec<Document>> {
        tracing::info!("Loading documents from {:?}", self.root_dir);
        let walker = Arc::clone(&self.walker);
        let extractor = Arc::clone(&self.extractor);
        let root = self.root_dir.clone();

        let documents = tokio::task::spawn_blocking(move || walker.load(&root, extractor.as_ref()))
            .await
            .map_err(|e| IngestError::TaskFailed(format!("Directory walk join error: {e}")))??;
        tracing::info!("Loaded {} documents", documents.len());
        Ok(documents)
    }

    /// Split loaded documents into chunks
    pub fn split(&self, documents: &[Document]) -> Vec<Document> {
        let chunks = self.chunker.split_documents(documents);
        tracing::info!(
            "Split into {} chunks (size {}, overlap {})",
            chunks.len(),
            self.chunker.chunk_size(),
            self.chunker.chunk_overlap()
        );
        chunks
    }

    /// Run the full pipeline and save the index
    ///
    /// Any failure aborts the run before anything is written.
    pub async fn run(&self, embedder: Arc<dyn Embedder>) -> Result<IngestStats> {
        self.run_with(move || Ok(embedder)).await
    }

    /// Run the full pipeline, creating the embedder once the chunks are ready
    ///
    /// Walk and split errors are reported before `make_embedder` is called.
    pub async fn run_with<F>(&self, make_embedder: F) -> Result<IngestStats>
    where
        F: FnOnce() -> Result<Arc<dyn Embedder>>,
    {
        let start = Instant::now();

        let documents = self.load_documents().await?;
        let chunks = self.split(&documents);
        let chunks_created = chunks.len();
        let estimated_wait_secs = self.rate_limit.estimate(chunks_created).as_secs();

        let embedder = make_embedder()?;

        let mut builder = IndexBuilder::new(embedder, Throttle::new(self.rate_limit.clone()));
        let index = builder.build(chunks, FlatIndex::new(self.space)).await?;
        index.save(&self.index_dir)?;

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Ingestion complete: {} files, {} chunks embedded in {}ms",
            documents.len(),
            index.len(),
            duration_ms
        );

        Ok(IngestStats {
            files_loaded: documents.len(),
            chunks_created,
            chunks_embedded: index.len(),
            estimated_wait_secs,
            duration_ms,
            index_dir: Some(self.index_dir.clone()),
        })
    }

    /// Walk and chunk without contacting the embedding service
    pub async fn dry_run(&self) -> Result<IngestStats> {
        let start = Instant::now();

        let documents = self.load_documents().await?;
        let chunks = self.split(&documents);
        let estimated_wait_secs = self.rate_limit.estimate(chunks.len()).as_secs();

        tracing::info!(
            "Dry run: {} chunks would be embedded, estimated time: {} seconds",
            chunks.len(),
            estimated_wait_secs
        );

        Ok(IngestStats {
            files_loaded: documents.len(),
            chunks_created: chunks.len(),
            chunks_embedded: 0,
            estimated_wait_secs,
            duration_ms: start.elapsed().as_millis() as u64,
            index_dir: None,
        })
    }
}
