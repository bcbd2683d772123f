// Test fixtures for integration testing

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary document tree plus a sibling output directory
///
/// Layout: `<tmp>/docs/...` holds the input files, `<tmp>/data` is
/// where an index gets saved.
pub struct TestTree {
    pub dir: TempDir,
    pub files: Vec<PathBuf>,
}

impl TestTree {
    /// A small Markdown/HTML documentation tree (5 files)
    #[allow(dead_code)]
    pub fn small() -> Self {
        Self::with_files(&[
            ("intro.md", "# Introduction\n\nWelcome to the docs."),
            (
                "guide/install.md",
                "## Install\n\nRun `cargo install` and **restart** your shell.",
            ),
            (
                "guide/usage.md",
                "## Usage\n\n- ingest\n- search\n\nSee [the FAQ](faq.md).",
            ),
            (
                "reference/api.html",
                "<html><body><h1>API</h1><p>Endpoints</p></body></html>",
            ),
            ("faq.md", "### FAQ\n\nNothing here yet."),
        ])
    }

    /// Create with custom files under `docs/`
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("docs");
        std::fs::create_dir_all(&root).unwrap();

        let mut paths = Vec::new();
        for (path, content) in files {
            let full_path = root.join(path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(&full_path, content).unwrap();
            paths.push(full_path);
        }

        Self { dir, files: paths }
    }

    /// Input root directory
    pub fn root(&self) -> PathBuf {
        self.dir.path().join("docs")
    }

    /// Index output directory (not created until a save)
    pub fn index_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    /// Base temp directory
    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
