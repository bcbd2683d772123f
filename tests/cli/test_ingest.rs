//! Ingest command tests (dry runs)

use crate::common::{test_config, TestTree};
use docingest::cli::commands::ingest::{execute, IngestArgs, IngestResponse};
use docingest::cli::OutputFormat;
use docingest::core::ingest::IngestPipeline;
use serial_test::serial;

#[tokio::test]
async fn test_dry_run_json() {
    let tree = TestTree::small();
    let args = IngestArgs {
        dry_run: true,
        ..IngestArgs::default()
    };

    let result = execute(args, test_config(&tree), OutputFormat::Json).await;

    assert!(result.is_ok(), "{result:?}");
    assert!(!tree.index_dir().exists());
}

#[tokio::test]
async fn test_dry_run_with_root_override() {
    let tree = TestTree::small();
    let mut config = test_config(&tree);
    config.input.root_dir = tree.path().join("elsewhere");

    let args = IngestArgs {
        root: Some(tree.root()),
        dry_run: true,
        ..IngestArgs::default()
    };

    assert!(execute(args, config, OutputFormat::Human).await.is_ok());
}

#[tokio::test]
async fn test_dry_run_missing_root_fails() {
    let tree = TestTree::small();
    let args = IngestArgs {
        root: Some(tree.path().join("missing")),
        dry_run: true,
        ..IngestArgs::default()
    };

    let err = execute(args, test_config(&tree), OutputFormat::Human)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Could not read directory"));
}

#[tokio::test]
#[serial]
async fn test_missing_root_reported_before_missing_key() {
    std::env::remove_var("OPENAI_API_KEY");
    let tree = TestTree::small();
    let args = IngestArgs {
        root: Some(tree.path().join("missing")),
        ..IngestArgs::default()
    };

    let err = execute(args, test_config(&tree), OutputFormat::Human)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Could not read directory"));
    assert!(!tree.index_dir().exists());
}

#[tokio::test]
#[serial]
async fn test_missing_key_reported_after_walk() {
    std::env::remove_var("OPENAI_API_KEY");
    let tree = TestTree::small();

    let err = execute(IngestArgs::default(), test_config(&tree), OutputFormat::Human)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("OPENAI_API_KEY"));
    assert!(!tree.index_dir().exists());
}

#[tokio::test]
async fn test_invalid_override_rejected() {
    let tree = TestTree::small();
    let args = IngestArgs {
        chunk_size: Some(10),
        chunk_overlap: Some(10),
        dry_run: true,
        ..IngestArgs::default()
    };

    assert!(execute(args, test_config(&tree), OutputFormat::Json)
        .await
        .is_err());
}

#[tokio::test]
async fn test_response_from_dry_run() {
    let tree = TestTree::small();
    let stats = IngestPipeline::from_config(&test_config(&tree))
        .unwrap()
        .dry_run()
        .await
        .unwrap();

    let response = IngestResponse::new(&tree.root(), true, stats);
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["dry_run"], true);
    assert_eq!(json["files_loaded"], 5);
    assert_eq!(json["chunks_embedded"], 0);
    assert!(json.get("index_dir").is_none());
}
