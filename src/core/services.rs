//! Unified service container for docingest
//!
//! Holds the configuration and the embedding client shared by the
//! ingest and search commands.

use crate::core::config::Config;
use crate::core::embedding::{Embedder, OpenAiEmbedder};
use crate::core::error::Result;
use crate::core::ingest::IngestPipeline;
use crate::core::store::{FlatIndex, VectorIndex};
use crate::core::types::{IngestStats, SearchHit};
use std::path::Path;
use std::sync::Arc;

/// Unified services container
#[derive(Clone)]
pub struct Services {
    /// Embedding client used for chunks and queries
    pub embedder: Arc<dyn Embedder>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services with the OpenAI client configured from
    /// `[embedding]` and `OPENAI_API_KEY`
    pub fn new(config: Config) -> Result<Self> {
        let embedder = OpenAiEmbedder::from_env(&config.embedding)?;
        Ok(Self::with_embedder(config, Arc::new(embedder)))
    }

    /// Create services around an existing embedder
    pub fn with_embedder(config: Config, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            config: Arc::new(config),
        }
    }

    /// Create an IngestPipeline from the current configuration
    pub fn create_pipeline(&self) -> Result<IngestPipeline> {
        IngestPipeline::from_config(&self.config)
    }

    /// Run a full ingestion
    pub async fn ingest(&self) -> Result<IngestStats> {
        self.create_pipeline()?
            .run(Arc::clone(&self.embedder))
            .await
    }

    /// Embed `query` and return the `k` nearest chunks of the index
    /// saved in `index_dir`
    pub async fn search(&self, index_dir: &Path, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        let index = FlatIndex::load(index_dir)?;
        tracing::debug!(
            "Searching {} vectors in {:?} for {:?}",
            index.len(),
            index_dir,
            query
        );

        let vector = self.embedder.embed(query).await?;
        index.search(&vector, k)
    }
}
