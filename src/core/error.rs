//! Error types and error handling for docingest.
//!
//! Every failure in the ingestion run is fatal: errors propagate
//! unchanged to the binary, which reports them and exits non-zero.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docingest operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Main error type for the ingestion pipeline
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Could not read directory: {}. Did you run the download step (`sh download.sh`)?", path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Embedding request failed: {0}")]
    EmbeddingFailed(String),

    #[error("Index error: {0}")]
    IndexError(String),

    #[error("Failed to persist index to {}: {message}", path.display())]
    PersistenceFailed { path: PathBuf, message: String },

    #[error("Background task failed: {0}")]
    TaskFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Directory walk failed: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl IngestError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this error came from bad configuration or arguments
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            IngestError::ConfigError(_) | IngestError::TomlError(_) | IngestError::InvalidPath(_)
        )
    }

    /// Check if this error came from the embedding service
    pub fn is_embedding_error(&self) -> bool {
        matches!(
            self,
            IngestError::EmbeddingFailed(_) | IngestError::HttpError(_)
        )
    }
}
