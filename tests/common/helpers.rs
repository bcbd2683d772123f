// Test helper functions

use async_trait::async_trait;
use docingest::core::config::Config;
use docingest::core::embedding::{Embedder, RateLimit};
use docingest::core::error::{IngestError, Result};
use docingest::core::services::Services;
use docingest::core::types::IngestStats;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::fixtures::TestTree;

/// Deterministic embedder: a small bag-of-letters vector
///
/// Records every text it was asked to embed.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockEmbedder {
    pub calls: Mutex<Vec<String>>,
}

impl MockEmbedder {
    #[allow(dead_code)]
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.lock().unwrap().push(text.to_string());

        let mut vector = vec![0.0f32; 26];
        for c in text.chars().filter(|c| c.is_ascii_alphabetic()) {
            vector[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        Ok(vector)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Embedder that fails on the given (1-based) call
#[allow(dead_code)]
pub struct FailingEmbedder {
    pub fail_on: usize,
    pub calls: AtomicUsize,
}

impl FailingEmbedder {
    #[allow(dead_code)]
    pub fn new(fail_on: usize) -> Self {
        Self {
            fail_on,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            return Err(IngestError::EmbeddingFailed(
                "service returned 500".to_string(),
            ));
        }
        Ok(vec![call as f32, 1.0])
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Configuration pointing at a test tree, with throttling disabled
pub fn test_config(tree: &TestTree) -> Config {
    let mut config = Config::default();
    config.input.root_dir = tree.root();
    config.output.index_dir = tree.index_dir();
    config.rate_limit = RateLimit::None;
    config
}

/// Services over a test tree using the given embedder
#[allow(dead_code)]
pub fn create_test_services(tree: &TestTree, embedder: Arc<dyn Embedder>) -> Services {
    Services::with_embedder(test_config(tree), embedder)
}

/// Assert that run stats are internally consistent
#[allow(dead_code)]
pub fn assert_valid_stats(stats: &IngestStats) {
    assert!(
        stats.files_loaded > 0,
        "Expected files_loaded > 0, got {}",
        stats.files_loaded
    );
    assert!(
        stats.chunks_created >= stats.files_loaded,
        "Expected chunks_created ({}) >= files_loaded ({})",
        stats.chunks_created,
        stats.files_loaded
    );
    assert_eq!(
        stats.chunks_embedded, stats.chunks_created,
        "Every chunk should have been embedded"
    );
}
