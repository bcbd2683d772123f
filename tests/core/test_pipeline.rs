// End-to-end ingestion through the pipeline and service container

use crate::common::{
    assert_valid_stats, create_test_services, test_config, FailingEmbedder, MockEmbedder,
    TestTree,
};
use docingest::core::embedding::RateLimit;
use docingest::core::error::IngestError;
use docingest::core::ingest::IngestPipeline;
use docingest::core::store::{FlatIndex, VectorIndex};
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[tokio::test]
async fn test_ingest_small_tree() {
    let tree = TestTree::small();
    let embedder = Arc::new(MockEmbedder::default());
    let services = create_test_services(&tree, embedder.clone());

    let stats = services.ingest().await.unwrap();

    assert_valid_stats(&stats);
    assert_eq!(stats.files_loaded, 5);
    assert_eq!(embedder.call_count(), stats.chunks_created);
    assert_eq!(stats.index_dir, Some(tree.index_dir()));

    let index = FlatIndex::load(&tree.index_dir()).unwrap();
    assert_eq!(index.len(), stats.chunks_embedded);
    assert_eq!(index.dimensions(), Some(26));
}

#[tokio::test]
async fn test_chunks_embedded_in_walk_order() {
    let tree = TestTree::with_files(&[("b.md", "second"), ("a.md", "first"), ("c/d.md", "third")]);
    let embedder = Arc::new(MockEmbedder::default());
    let services = create_test_services(&tree, embedder.clone());

    services.ingest().await.unwrap();

    let calls = embedder.calls.lock().unwrap().clone();
    assert_eq!(calls, vec!["first", "second", "third"]);

    let index = FlatIndex::load(&tree.index_dir()).unwrap();
    let stored: Vec<_> = index
        .documents()
        .iter()
        .map(|d| d.page_content.as_str())
        .collect();
    assert_eq!(stored, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_missing_root_aborts_before_embedding() {
    let tree = TestTree::with_files(&[]);
    let mut config = test_config(&tree);
    config.input.root_dir = tree.path().join("ingest/markdown");

    let embedder = Arc::new(MockEmbedder::default());
    let pipeline = IngestPipeline::from_config(&config).unwrap();
    let err = pipeline.run(embedder.clone()).await.unwrap_err();

    assert!(matches!(err, IngestError::DirectoryUnreadable { .. }));
    assert!(err.to_string().contains("ingest/markdown"));
    assert_eq!(embedder.call_count(), 0);
    assert!(!tree.index_dir().exists());
}

#[tokio::test]
async fn test_embedding_failure_writes_no_index() {
    let tree = TestTree::with_files(&[
        ("1.md", "one"),
        ("2.md", "two"),
        ("3.md", "three"),
        ("4.md", "four"),
        ("5.md", "five"),
    ]);
    let embedder = Arc::new(FailingEmbedder::new(3));
    let services = create_test_services(&tree, embedder.clone());

    let err = services.ingest().await.unwrap_err();

    assert!(err.is_embedding_error());
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 3);
    assert!(!tree.index_dir().exists());
}

#[tokio::test]
async fn test_failed_rerun_keeps_previous_index() {
    let tree = TestTree::with_files(&[("1.md", "one"), ("2.md", "two")]);

    let services = create_test_services(&tree, Arc::new(MockEmbedder::default()));
    services.ingest().await.unwrap();

    let services = create_test_services(&tree, Arc::new(FailingEmbedder::new(2)));
    assert!(services.ingest().await.is_err());

    let index = FlatIndex::load(&tree.index_dir()).unwrap();
    assert_eq!(index.len(), 2);
}

#[tokio::test]
async fn test_fixed_delay_applies_per_chunk() {
    let tree = TestTree::with_files(&[("1.md", "one"), ("2.md", "two"), ("3.md", "three")]);
    let mut config = test_config(&tree);
    config.rate_limit = RateLimit::FixedDelay { delay_ms: 10 };

    let pipeline = IngestPipeline::from_config(&config).unwrap();
    let start = std::time::Instant::now();
    let stats = pipeline
        .run(Arc::new(MockEmbedder::default()))
        .await
        .unwrap();

    assert_eq!(stats.chunks_embedded, 3);
    assert!(start.elapsed() >= std::time::Duration::from_millis(30));
}

#[tokio::test]
async fn test_dry_run_estimates_reference_throttle() {
    let tree = TestTree::small();
    let mut config = test_config(&tree);
    config.rate_limit = RateLimit::default();

    let stats = IngestPipeline::from_config(&config)
        .unwrap()
        .dry_run()
        .await
        .unwrap();

    assert_eq!(stats.files_loaded, 5);
    assert_eq!(stats.chunks_embedded, 0);
    assert_eq!(stats.estimated_wait_secs, stats.chunks_created as u64 * 45);
    assert!(!tree.index_dir().exists());
}
