//! Recursive character text splitting with overlap.
//!
//! Text is split on the first separator it contains (paragraph break,
//! line break, space, then single characters). Small pieces are merged
//! greedily back into chunks of at most `chunk_size` characters; pieces
//! that are still too large are split again with the next separator.
//! When a chunk is emitted, the tail of it (at most `chunk_overlap`
//! characters) carries over into the next one.
//!
//! All sizes are measured in **characters**, not bytes, and every split
//! point falls on a character boundary.
//!
//! # Example
//!
//! ```
//! use docingest::ingest::Chunker;
//!
//! let chunker = Chunker::new(10, 3).unwrap();
//! let chunks = chunker.split_text("one two three four");
//!
//! assert!(chunks.iter().all(|c| c.chars().count() <= 10));
//! ```

use std::collections::VecDeque;

use crate::core::error::{IngestError, Result};
use crate::core::types::Document;

/// Separators tried in order, coarsest first. The empty separator
/// splits between characters.
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", " ", ""];

/// Recursive character splitter
#[derive(Debug, Clone)]
pub struct Chunker {
    /// Maximum characters per chunk
    chunk_size: usize,

    /// Maximum characters carried from one chunk into the next
    chunk_overlap: usize,
}

impl Chunker {
    /// Create a new chunker
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `chunk_size` is 0 or if
    /// `chunk_overlap >= chunk_size`.
    ///
    /// # Example
    ///
    /// ```
    /// use docingest::ingest::Chunker;
    ///
    /// let chunker = Chunker::new(8000, 100).unwrap();
    /// assert_eq!(chunker.chunk_size(), 8000);
    /// assert!(Chunker::new(100, 100).is_err());
    /// ```
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(IngestError::ConfigError(
                "chunk_size must be > 0".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(IngestError::ConfigError(format!(
                "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    /// Get the chunk size in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Get the overlap in characters.
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split every document, preserving order and metadata
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Document> {
        let mut chunks = Vec::new();

        for document in documents {
            for text in self.split_text(&document.page_content) {
                chunks.push(Document {
                    page_content: text,
                    metadata: document.metadata.clone(),
                });
            }
        }

        tracing::debug!(
            "Split {} documents into {} chunks",
            documents.len(),
            chunks.len()
        );
        chunks
    }

    /// Split text into chunks of at most `chunk_size` characters
    ///
    /// Returns no chunks for empty or whitespace-only text.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        self.split_recursive(text, DEFAULT_SEPARATORS, &mut chunks);
        chunks
    }

    fn split_recursive(&self, text: &str, separators: &[&str], out: &mut Vec<String>) {
        let (separator, remaining) = pick_separator(text, separators);
        let splits = split_on(text, separator);

        let mut good: Vec<&str> = Vec::new();
        for piece in splits {
            if char_len(piece) < self.chunk_size {
                good.push(piece);
                continue;
            }

            if !good.is_empty() {
                self.merge_splits(&good, separator, out);
                good.clear();
            }

            match remaining {
                Some(next) => self.split_recursive(piece, next, out),
                // Single characters cannot be split further
                None => out.push(piece.to_string()),
            }
        }

        if !good.is_empty() {
            self.merge_splits(&good, separator, out);
        }
    }

    /// Greedily join pieces into chunks, carrying an overlap forward
    fn merge_splits(&self, splits: &[&str], separator: &str, out: &mut Vec<String>) {
        let sep_len = char_len(separator);
        let mut current: VecDeque<&str> = VecDeque::new();
        // Joined length of `current`, separators included
        let mut total = 0usize;

        for &piece in splits {
            let len = char_len(piece);
            let joined_sep = if current.is_empty() { 0 } else { sep_len };

            if total + len + joined_sep > self.chunk_size {
                if total > self.chunk_size {
                    tracing::warn!(
                        "Created a chunk of {} characters, longer than the limit of {}",
                        total,
                        self.chunk_size
                    );
                }

                if !current.is_empty() {
                    if let Some(chunk) = join_pieces(&current, separator) {
                        out.push(chunk);
                    }

                    while total > self.chunk_overlap
                        || (total > 0
                            && total + len + if current.is_empty() { 0 } else { sep_len }
                                > self.chunk_size)
                    {
                        let Some(front) = current.pop_front() else {
                            break;
                        };
                        let dropped_sep = if current.is_empty() { 0 } else { sep_len };
                        total = total.saturating_sub(char_len(front) + dropped_sep);
                    }
                }
            }

            let joined_sep = if current.is_empty() { 0 } else { sep_len };
            current.push_back(piece);
            total += len + joined_sep;
        }

        if let Some(chunk) = join_pieces(&current, separator) {
            out.push(chunk);
        }
    }
}

/// First separator present in `text`, and the separators left for
/// recursing into oversized pieces
fn pick_separator<'s>(text: &str, separators: &'s [&'s str]) -> (&'s str, Option<&'s [&'s str]>) {
    for (i, &separator) in separators.iter().enumerate() {
        if separator.is_empty() {
            return (separator, None);
        }
        if text.contains(separator) {
            return (separator, Some(&separators[i + 1..]));
        }
    }
    ("", None)
}

fn split_on<'t>(text: &'t str, separator: &str) -> Vec<&'t str> {
    if separator.is_empty() {
        text.char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect()
    } else {
        text.split(separator).filter(|s| !s.is_empty()).collect()
    }
}

fn join_pieces(pieces: &VecDeque<&str>, separator: &str) -> Option<String> {
    let mut joined = String::new();
    for (i, piece) in pieces.iter().enumerate() {
        if i > 0 {
            joined.push_str(separator);
        }
        joined.push_str(piece);
    }

    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
