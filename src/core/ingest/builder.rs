//! Embedding loop that fills a vector index.
//!
//! Chunks are processed strictly one at a time: wait for the throttle,
//! embed, insert, pause. The first failure ends the build and the
//! partially filled index is dropped unsaved.

use std::sync::Arc;

use crate::core::embedding::{Embedder, Throttle};
use crate::core::error::Result;
use crate::core::store::VectorIndex;
use crate::core::types::Document;

/// Sequential, rate-limited index builder
pub struct IndexBuilder {
    embedder: Arc<dyn Embedder>,
    throttle: Throttle,
}

impl IndexBuilder {
    /// Create a builder around an embedding client and throttle
    pub fn new(embedder: Arc<dyn Embedder>, throttle: Throttle) -> Self {
        Self { embedder, throttle }
    }

    /// Embed every chunk in order and insert it into `index`
    ///
    /// Returns the filled index. Nothing is persisted here; the caller
    /// saves once the whole build has succeeded.
    pub async fn build<I: VectorIndex>(&mut self, chunks: Vec<Document>, mut index: I) -> Result<I> {
        let total = chunks.len();
        let estimate = self.throttle.policy().estimate(total);
        tracing::info!(
            "Embedding {} chunks with {} (throttle: {}), estimated time: {} seconds",
            total,
            self.embedder.name(),
            self.throttle.policy(),
            estimate.as_secs()
        );

        for (idx, chunk) in chunks.into_iter().enumerate() {
            self.throttle.acquire().await;

            tracing::info!(
                "Chunk {}/{}: {} characters",
                idx + 1,
                total,
                chunk.char_len()
            );

            let vector = self.embedder.embed(&chunk.page_content).await.map_err(|e| {
                tracing::error!("Embedding chunk {}/{} failed: {}", idx + 1, total, e);
                e
            })?;
            index.insert(vector, chunk)?;

            self.throttle.pause().await;
        }

        tracing::info!("Embedded {} chunks", index.len());
        Ok(index)
    }
}
