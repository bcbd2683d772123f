//! Embedding service access.
//!
//! The pipeline only needs "text in, vector out". [`Embedder`] is that
//! seam; [`OpenAiEmbedder`] is the production implementation and tests
//! substitute their own. [`Throttle`] keeps request rates under the
//! service's ceiling.

pub mod openai;
pub mod throttle;

use async_trait::async_trait;

use crate::core::error::Result;

pub use openai::OpenAiEmbedder;
pub use throttle::{RateLimit, Throttle};

/// Trait for generating text embeddings
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate the embedding vector for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
