//! Exact (brute-force) vector index with JSON persistence.
//!
//! On-disk layout of a saved index directory:
//!
//! - `args.json`: space, dimensions, count, creation time, generation
//! - `docstore.json`: generation plus `[id, document]` pairs in insertion order
//! - `vectors.json`: generation plus vectors in insertion order (position = id)
//!
//! All three files are staged as `.tmp` siblings before any of them is
//! renamed into place. Every file carries the same generation id and
//! [`FlatIndex::load`] rejects a directory whose files disagree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::error::{IngestError, Result};
use crate::core::store::{Space, VectorIndex};
use crate::core::types::{Document, SearchHit};

pub const ARGS_FILE: &str = "args.json";
pub const DOCSTORE_FILE: &str = "docstore.json";
pub const VECTORS_FILE: &str = "vectors.json";

static SAVE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Index parameters persisted next to the data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexArgs {
    pub space: Space,
    pub num_dimensions: Option<usize>,
    pub count: usize,
    pub created_at: DateTime<Utc>,
    pub generation: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct DocstoreFile<D> {
    generation: String,
    entries: Vec<(usize, D)>,
}

#[derive(Debug, Serialize, Deserialize)]
struct VectorsFile<V> {
    generation: String,
    vectors: V,
}

/// In-memory exact nearest-neighbour index
#[derive(Debug, Clone)]
pub struct FlatIndex {
    space: Space,

    /// Fixed by the first insertion
    dimensions: Option<usize>,

    vectors: Vec<Vec<f32>>,
    documents: Vec<Document>,
}

impl FlatIndex {
    /// Create an empty index in the given space
    pub fn new(space: Space) -> Self {
        Self {
            space,
            dimensions: None,
            vectors: Vec::new(),
            documents: Vec::new(),
        }
    }

    /// Distance space of this index
    pub fn space(&self) -> Space {
        self.space
    }

    /// Vector dimension, once known
    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    /// Stored documents in insertion order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Load an index previously written by [`VectorIndex::save`]
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(IngestError::InvalidPath(format!(
                "No saved index at {}",
                dir.display()
            )));
        }

        let args: IndexArgs = read_json(&dir.join(ARGS_FILE))?;
        let docstore: DocstoreFile<Document> = read_json(&dir.join(DOCSTORE_FILE))?;
        let vectors: VectorsFile<Vec<Vec<f32>>> = read_json(&dir.join(VECTORS_FILE))?;

        if docstore.generation != args.generation || vectors.generation != args.generation {
            return Err(IngestError::IndexError(format!(
                "Index at {} mixes files from different saves: args {}, docstore {}, vectors {}",
                dir.display(),
                args.generation,
                docstore.generation,
                vectors.generation
            )));
        }

        let docstore = docstore.entries;
        let vectors = vectors.vectors;

        if docstore.len() != args.count || vectors.len() != args.count {
            return Err(IngestError::IndexError(format!(
                "Index at {} is inconsistent: args count {}, {} documents, {} vectors",
                dir.display(),
                args.count,
                docstore.len(),
                vectors.len()
            )));
        }

        if let Some(dims) = args.num_dimensions {
            if let Some(bad) = vectors.iter().position(|v| v.len() != dims) {
                return Err(IngestError::IndexError(format!(
                    "Vector {bad} has {} dimensions, expected {dims}",
                    vectors[bad].len()
                )));
            }
        }

        let mut documents = Vec::with_capacity(docstore.len());
        for (expected, (id, document)) in docstore.into_iter().enumerate() {
            if id != expected {
                return Err(IngestError::IndexError(format!(
                    "Docstore entry {expected} has id {id}"
                )));
            }
            documents.push(document);
        }

        tracing::debug!("Loaded {} vectors from {:?}", vectors.len(), dir);

        Ok(Self {
            space: args.space,
            dimensions: args.num_dimensions,
            vectors,
            documents,
        })
    }
}

impl VectorIndex for FlatIndex {
    fn insert(&mut self, vector: Vec<f32>, document: Document) -> Result<()> {
        if vector.is_empty() {
            return Err(IngestError::IndexError(
                "Cannot insert an empty vector".to_string(),
            ));
        }

        match self.dimensions {
            Some(dims) if dims != vector.len() => {
                return Err(IngestError::IndexError(format!(
                    "Vector has {} dimensions, index expects {dims}",
                    vector.len()
                )));
            }
            Some(_) => {}
            None => self.dimensions = Some(vector.len()),
        }

        self.vectors.push(vector);
        self.documents.push(document);
        Ok(())
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if k == 0 || self.vectors.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(dims) = self.dimensions {
            if query.len() != dims {
                return Err(IngestError::IndexError(format!(
                    "Query has {} dimensions, index expects {dims}",
                    query.len()
                )));
            }
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(id, v)| (id, self.space.distance(query, v)))
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(id, distance)| SearchHit {
                distance,
                document: self.documents[id].clone(),
            })
            .collect())
    }

    fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).map_err(|e| persistence_error(dir, e))?;

        let created_at = Utc::now();
        let generation = format!(
            "{}-{}-{}",
            created_at.timestamp_nanos_opt().unwrap_or_default(),
            std::process::id(),
            SAVE_SEQ.fetch_add(1, Ordering::Relaxed)
        );
        let args = IndexArgs {
            space: self.space,
            num_dimensions: self.dimensions,
            count: self.vectors.len(),
            created_at,
            generation: generation.clone(),
        };
        let docstore = DocstoreFile {
            generation: generation.clone(),
            entries: self.documents.iter().enumerate().collect(),
        };
        let vectors = VectorsFile {
            generation,
            vectors: &self.vectors,
        };

        let mut staged = Vec::with_capacity(3);
        let written = stage_json(&dir.join(VECTORS_FILE), &vectors, &mut staged)
            .and_then(|_| stage_json(&dir.join(DOCSTORE_FILE), &docstore, &mut staged))
            .and_then(|_| stage_json(&dir.join(ARGS_FILE), &args, &mut staged));
        if let Err(e) = written {
            discard_staged(&staged);
            return Err(e);
        }

        for (i, (tmp, path)) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(tmp, path) {
                discard_staged(&staged[i..]);
                return Err(persistence_error(path, e));
            }
        }

        tracing::info!("Saved {} vectors to {:?}", self.vectors.len(), dir);
        Ok(())
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }
}

fn persistence_error(path: &Path, e: impl std::fmt::Display) -> IngestError {
    IngestError::PersistenceFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Write `value` next to `path` as a `.json.tmp` file, recording the pair
fn stage_json<T: Serialize>(
    path: &Path,
    value: &T,
    staged: &mut Vec<(PathBuf, PathBuf)>,
) -> Result<()> {
    let json = serde_json::to_vec(value)?;
    let mut tmp = PathBuf::from(path);
    tmp.set_extension("json.tmp");

    fs::write(&tmp, json).map_err(|e| persistence_error(&tmp, e))?;
    staged.push((tmp, path.to_path_buf()));
    Ok(())
}

fn discard_staged(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        if let Err(e) = fs::remove_file(tmp) {
            tracing::warn!("Failed to remove staged file {:?}: {}", tmp, e);
        }
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let contents = fs::read(path).map_err(|e| {
        IngestError::IndexError(format!("Failed to read {}: {e}", path.display()))
    })?;
    Ok(serde_json::from_slice(&contents)?)
}
