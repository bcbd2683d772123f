//! Similarity index storage.
//!
//! [`VectorIndex`] is the narrow seam the pipeline writes through:
//! insert `(vector, chunk)` pairs one at a time, then persist once.
//! [`FlatIndex`] is the bundled exact-search implementation.

pub mod flat;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::core::error::Result;
use crate::core::types::{Document, SearchHit};

pub use flat::FlatIndex;

/// Distance space for similarity lookups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Space {
    /// Inner product (distance = 1 - dot)
    #[default]
    Ip,
    /// Cosine (distance = 1 - cosine similarity)
    Cosine,
    /// Squared euclidean distance
    L2,
}

impl Space {
    /// Distance between two equal-length vectors (lower = closer)
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Space::Ip => 1.0 - dot(a, b),
            Space::Cosine => {
                let norm = (dot(a, a) * dot(b, b)).sqrt();
                if norm == 0.0 {
                    1.0
                } else {
                    1.0 - dot(a, b) / norm
                }
            }
            Space::L2 => a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum(),
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Space::Ip => "ip",
            Space::Cosine => "cosine",
            Space::L2 => "l2",
        };
        f.write_str(name)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Trait for vector index backends
pub trait VectorIndex: Send {
    /// Insert one embedding with the chunk it was computed from
    fn insert(&mut self, vector: Vec<f32>, document: Document) -> Result<()>;

    /// Return the `k` nearest stored chunks to `query`
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>>;

    /// Serialize the whole index into `dir`
    fn save(&self, dir: &Path) -> Result<()>;

    /// Number of stored vectors
    fn len(&self) -> usize;

    /// Whether the index holds no vectors
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
