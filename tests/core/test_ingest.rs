// Walker, extractor and chunker behaviour over real directory trees

use crate::common::TestTree;
use docingest::core::error::IngestError;
use docingest::core::ingest::{Chunker, DirectoryWalker, HtmlExtractor, MarkdownExtractor};
use std::path::Path;

#[test]
fn test_walker_loads_every_regular_file() {
    let tree = TestTree::small();
    let walker = DirectoryWalker::new(vec![], vec![]).unwrap();

    let docs = walker.load(&tree.root(), &MarkdownExtractor).unwrap();

    assert_eq!(docs.len(), tree.files.len());
    for doc in &docs {
        let source = doc.source().expect("every document has a source");
        assert!(tree.files.iter().any(|f| Path::new(source) == f));
    }
}

#[test]
fn test_walker_is_idempotent() {
    let tree = TestTree::small();
    let walker = DirectoryWalker::new(vec![], vec![]).unwrap();

    let first = walker.load(&tree.root(), &MarkdownExtractor).unwrap();
    let second = walker.load(&tree.root(), &MarkdownExtractor).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_scenario_single_markdown_file() {
    let tree = TestTree::with_files(&[("a.md", "# Hello\nWorld")]);
    let walker = DirectoryWalker::new(vec![], vec![]).unwrap();

    let docs = walker.load(&tree.root(), &MarkdownExtractor).unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].page_content, "Hello World");
    assert!(docs[0].source().unwrap().ends_with("a.md"));
}

#[test]
fn test_missing_root_names_the_path() {
    let tree = TestTree::with_files(&[]);
    let missing = tree.path().join("ingest").join("markdown");
    let walker = DirectoryWalker::new(vec![], vec![]).unwrap();

    let err = walker.load(&missing, &MarkdownExtractor).unwrap_err();

    assert!(matches!(err, IngestError::DirectoryUnreadable { .. }));
    let message = err.to_string();
    assert!(message.contains(&missing.display().to_string()));
    assert!(message.contains("download"));
}

#[test]
fn test_markdown_markup_is_stripped() {
    let tree = TestTree::small();
    let walker = DirectoryWalker::new(vec!["*.md".to_string()], vec![]).unwrap();

    let docs = walker.load(&tree.root(), &MarkdownExtractor).unwrap();

    assert_eq!(docs.len(), 4);
    for doc in &docs {
        assert!(!doc.page_content.starts_with('#'), "{:?}", doc.page_content);
        assert!(!doc.page_content.contains("**"));
        assert!(!doc.page_content.contains("]("));
    }
}

#[test]
fn test_html_tags_are_stripped() {
    let tree = TestTree::small();
    let walker = DirectoryWalker::new(vec!["*.html".to_string()], vec![]).unwrap();

    let docs = walker.load(&tree.root(), &HtmlExtractor).unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].page_content, "API Endpoints");
    assert!(!docs[0].page_content.contains('<'));
    assert!(!docs[0].page_content.contains('>'));
}

#[test]
fn test_scenario_8500_characters() {
    let tree = TestTree::with_files(&[("long.md", &"lorem ".repeat(1416))]);
    let walker = DirectoryWalker::new(vec![], vec![]).unwrap();
    let docs = walker.load(&tree.root(), &MarkdownExtractor).unwrap();
    // 1416 words joined by single spaces
    assert_eq!(docs[0].char_len(), 8495);

    let chunker = Chunker::new(8000, 100).unwrap();
    let chunks = chunker.split_documents(&docs);

    assert_eq!(chunks.len(), 2);
    assert!(chunks[0].char_len() <= 8000);
    let first = &chunks[0].page_content;
    let tail_start = first
        .char_indices()
        .nth(chunks[0].char_len() - 100)
        .map(|(i, _)| i)
        .unwrap();
    let head: String = chunks[1].page_content.chars().take(20).collect();
    assert!(first[tail_start..].contains(&head));
    assert_eq!(chunks[0].metadata, docs[0].metadata);
    assert_eq!(chunks[1].metadata, docs[0].metadata);
}

#[test]
fn test_chunks_bounded_across_tree() {
    let long = "Paragraph one is here.\n\nParagraph two follows with more words.\n".repeat(40);
    let tree = TestTree::with_files(&[("a.md", &long), ("b.md", "short")]);
    let walker = DirectoryWalker::new(vec![], vec![]).unwrap();
    let docs = walker.load(&tree.root(), &MarkdownExtractor).unwrap();

    let chunker = Chunker::new(200, 20).unwrap();
    let chunks = chunker.split_documents(&docs);

    assert!(chunks.len() > 2);
    for chunk in &chunks {
        assert!(chunk.char_len() <= 200);
    }
    assert_eq!(chunks.last().unwrap().page_content, "short");
}

#[test]
fn test_multibyte_content_survives() {
    let tree = TestTree::with_files(&[(
        "unicode.md",
        "# \u{65E5}\u{672C}\u{8A9E}\n\n\u{1F980} crab and \u{1F680} rocket \u{00E9}t\u{00E9}",
    )]);
    let walker = DirectoryWalker::new(vec![], vec![]).unwrap();
    let docs = walker.load(&tree.root(), &MarkdownExtractor).unwrap();

    let chunker = Chunker::new(5, 1).unwrap();
    let chunks = chunker.split_documents(&docs);

    let all: String = chunks.iter().map(|c| c.page_content.as_str()).collect();
    assert!(all.contains("\u{1F980}"));
    assert!(all.contains("\u{65E5}"));
    for chunk in &chunks {
        assert!(chunk.char_len() <= 5);
    }
}
