//! Recursive directory walker producing one document per file.
//!
//! Every regular file under the root becomes a [`Document`] whose
//! `source` metadata is the file path. Unlike a best-effort crawler,
//! any listing or read error aborts the walk.

use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{IngestError, Result};
use crate::core::ingest::TextExtractor;
use crate::core::types::Document;

/// File system walker with optional pattern-based filtering
pub struct DirectoryWalker {
    /// Patterns to include (empty = every file)
    include_patterns: Vec<Pattern>,

    /// Patterns to exclude
    exclude_patterns: Vec<Pattern>,
}

impl DirectoryWalker {
    /// Create a new walker
    ///
    /// # Arguments
    ///
    /// * `include_patterns` - Glob patterns for files to include
    /// * `exclude_patterns` - Glob patterns for files or directories
    ///   to exclude
    ///
    /// # Returns
    ///
    /// A new `DirectoryWalker` or a configuration error if a pattern
    /// is invalid
    pub fn new(include_patterns: Vec<String>, exclude_patterns: Vec<String>) -> Result<Self> {
        let include = include_patterns
            .into_iter()
            .map(|p| {
                Pattern::new(&p).map_err(|e| {
                    IngestError::ConfigError(format!("Invalid include pattern '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let exclude = exclude_patterns
            .into_iter()
            .map(|p| {
                Pattern::new(&p).map_err(|e| {
                    IngestError::ConfigError(format!("Invalid exclude pattern '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            include_patterns: include,
            exclude_patterns: exclude,
        })
    }

    /// Load every matching file under `root` as a document
    ///
    /// Files are read and passed through `extractor` as they are
    /// visited, in file-name order within each directory.
    pub fn load(&self, root: &Path, extractor: &dyn TextExtractor) -> Result<Vec<Document>> {
        let files = self.collect_files(root)?;
        let mut documents = Vec::with_capacity(files.len());

        for path in files {
            let raw = fs::read(&path).map_err(|e| {
                tracing::error!("Failed to read {:?}: {}", path, e);
                e
            })?;
            let text = extractor.extract_text(&raw);
            tracing::debug!("Loaded {:?} ({} chars)", path, text.chars().count());
            documents.push(Document::from_source(text, &path));
        }

        Ok(documents)
    }

    /// Collect all matching regular files beneath `root`
    ///
    /// Fails with [`IngestError::DirectoryUnreadable`] if `root`
    /// cannot be listed; any later walk error propagates as-is.
    pub fn collect_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        fs::read_dir(root).map_err(|source| IngestError::DirectoryUnreadable {
            path: root.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.should_process_entry(e, root))
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if self.matches_patterns(path) {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    /// Prune excluded directory trees early. Never filters the root.
    fn should_process_entry(&self, entry: &DirEntry, root: &Path) -> bool {
        let path = entry.path();
        if path == root || !entry.file_type().is_dir() {
            return true;
        }

        for pattern in &self.exclude_patterns {
            if pattern.matches_path(path) {
                tracing::debug!("Skipping excluded directory: {:?}", path);
                return false;
            }
        }

        true
    }

    /// Check if a file path matches the include/exclude patterns
    fn matches_patterns(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        let matches_include = self.include_patterns.is_empty()
            || self.include_patterns.iter().any(|p| {
                // Match against both full path and filename
                p.matches(&path_str)
                    || path
                        .file_name()
                        .and_then(|f| f.to_str())
                        .map(|f| p.matches(f))
                        .unwrap_or(false)
            });

        if !matches_include {
            return false;
        }

        !self
            .exclude_patterns
            .iter()
            .any(|p| p.matches(&path_str) || p.matches_path(path))
    }
}
