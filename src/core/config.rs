//! Configuration management for docingest.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with defaults matching the reference
//! ingestion run (8000/100 chunking, 45 s between embeddings).

use crate::core::embedding::RateLimit;
use crate::core::error::{IngestError, Result};
use crate::core::ingest::ExtractorKind;
use crate::core::store::Space;
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub rate_limit: RateLimit,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Input (directory walking and extraction) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// Root directory holding the pre-downloaded markup files
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// Markup flavour used to extract text
    #[serde(default)]
    pub extractor: ExtractorKind,

    /// File patterns to include (glob syntax, empty = all files)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// File patterns to exclude (glob syntax)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Chunking configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChunkingConfig {
    /// Maximum characters per chunk (not bytes!)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Character overlap between consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

/// Embedding service configuration
///
/// The API key is read from `OPENAI_API_KEY` and never stored here.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Embedding model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Optional output dimension override (model permitting)
    #[serde(default)]
    pub dimensions: Option<usize>,

    /// Replace newlines with spaces before embedding
    #[serde(default = "default_strip_new_lines")]
    pub strip_new_lines: bool,

    /// Per-request timeout; unset means no timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Output (persisted index) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory the finished index is written to
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,

    /// Distance space used for similarity lookups
    #[serde(default)]
    pub space: Space,
}

// Default value functions
fn default_root_dir() -> PathBuf {
    PathBuf::from("ingest/markdown")
}

fn default_chunk_size() -> usize {
    8000
}

fn default_chunk_overlap() -> usize {
    100
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "text-embedding-ada-002".to_string()
}

fn default_strip_new_lines() -> bool {
    true
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            extractor: ExtractorKind::default(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            dimensions: None,
            strip_new_lines: default_strip_new_lines(),
            timeout_secs: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            index_dir: default_index_dir(),
            space: Space::default(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| IngestError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        xdg.log_paths();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. DOCINGEST_CONFIG env var
    /// 2. XDG config file (~/.config/docingest/config.toml)
    /// 3. ./docingest.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("DOCINGEST_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("docingest.toml").exists() {
                Self::from_file("docingest.toml")?
            } else {
                Self::default()
            }
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(root) = env::var("DOCINGEST_ROOT_DIR") {
            self.input.root_dir = PathBuf::from(root);
        }
        if let Ok(dir) = env::var("DOCINGEST_INDEX_DIR") {
            self.output.index_dir = PathBuf::from(dir);
        }

        if let Ok(chunk_size) = env::var("DOCINGEST_CHUNK_SIZE") {
            if let Ok(size) = chunk_size.parse() {
                self.chunking.chunk_size = size;
            }
        }
        if let Ok(overlap) = env::var("DOCINGEST_CHUNK_OVERLAP") {
            if let Ok(o) = overlap.parse() {
                self.chunking.chunk_overlap = o;
            }
        }

        if let Ok(model) = env::var("DOCINGEST_EMBED_MODEL") {
            self.embedding.model = model;
        }
        if let Ok(base_url) = env::var("DOCINGEST_EMBED_BASE_URL") {
            self.embedding.base_url = base_url;
        }

        // A bare delay override always means the fixed-delay policy
        if let Ok(delay) = env::var("DOCINGEST_DELAY_MS") {
            if let Ok(delay_ms) = delay.parse() {
                self.rate_limit = RateLimit::FixedDelay { delay_ms };
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(IngestError::ConfigError(
                "Chunk size must be non-zero".to_string(),
            ));
        }

        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(IngestError::ConfigError(
                "Chunk overlap must be less than chunk size".to_string(),
            ));
        }

        if self.embedding.model.trim().is_empty() {
            return Err(IngestError::ConfigError(
                "Embedding model must be set".to_string(),
            ));
        }

        if self.embedding.base_url.trim().is_empty() {
            return Err(IngestError::ConfigError(
                "Embedding base URL must be set".to_string(),
            ));
        }

        if self.embedding.timeout_secs == Some(0) {
            return Err(IngestError::ConfigError(
                "Embedding timeout must be non-zero when set".to_string(),
            ));
        }

        self.rate_limit.validate()?;

        Ok(())
    }

    /// Log configuration (the API key is never part of it)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Root dir: {:?}", self.input.root_dir);
        tracing::info!("  Extractor: {}", self.input.extractor);
        tracing::info!(
            "  Include patterns: {} patterns",
            self.input.include_patterns.len()
        );
        tracing::info!(
            "  Exclude patterns: {} patterns",
            self.input.exclude_patterns.len()
        );
        tracing::info!("  Chunk size: {} chars", self.chunking.chunk_size);
        tracing::info!("  Chunk overlap: {} chars", self.chunking.chunk_overlap);
        tracing::info!("  Embedding model: {}", self.embedding.model);
        tracing::info!("  Embedding endpoint: {}", self.embedding.base_url);
        tracing::info!("  Rate limit: {}", self.rate_limit);
        tracing::info!("  Index dir: {:?}", self.output.index_dir);
        tracing::info!("  Space: {}", self.output.space);
    }
}
