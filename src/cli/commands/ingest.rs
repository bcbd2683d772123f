//! Ingest command - build and save the index

use crate::cli::output::{colors, format_duration};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::ingest::IngestPipeline;
use crate::core::services::Services;
use crate::core::types::IngestStats;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the ingest command
#[derive(Args, Debug, Default)]
pub struct IngestArgs {
    /// Directory to ingest (overrides `input.root_dir`)
    #[arg(long, short = 'r')]
    pub root: Option<PathBuf>,

    /// Directory to save the index to (overrides `output.index_dir`)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Characters per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlap between consecutive chunks in characters
    #[arg(long)]
    pub chunk_overlap: Option<usize>,

    /// Walk and chunk only; do not call the embedding service
    #[arg(long)]
    pub dry_run: bool,
}

impl IngestArgs {
    /// Apply command-line overrides on top of loaded configuration
    pub fn apply(&self, config: &mut Config) -> crate::core::error::Result<()> {
        if let Some(root) = &self.root {
            config.input.root_dir = root.clone();
        }
        if let Some(output) = &self.output {
            config.output.index_dir = output.clone();
        }
        if let Some(size) = self.chunk_size {
            config.chunking.chunk_size = size;
        }
        if let Some(overlap) = self.chunk_overlap {
            config.chunking.chunk_overlap = overlap;
        }
        config.validate()
    }
}

/// Ingestion result response
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub root: String,
    pub dry_run: bool,
    pub files_loaded: usize,
    pub chunks_created: usize,
    pub chunks_embedded: usize,
    pub estimated_wait_secs: u64,
    pub duration_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_dir: Option<String>,
}

impl IngestResponse {
    pub fn new(root: &std::path::Path, dry_run: bool, stats: IngestStats) -> Self {
        Self {
            root: root.display().to_string(),
            dry_run,
            files_loaded: stats.files_loaded,
            chunks_created: stats.chunks_created,
            chunks_embedded: stats.chunks_embedded,
            estimated_wait_secs: stats.estimated_wait_secs,
            duration_secs: stats.duration_ms as f64 / 1000.0,
            index_dir: stats.index_dir.map(|p| p.display().to_string()),
        }
    }
}

/// Execute the ingest command
pub async fn execute(
    args: IngestArgs,
    mut config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    args.apply(&mut config)?;
    let root = config.input.root_dir.clone();

    if format == OutputFormat::Human {
        eprintln!(
            "Ingesting {}{}...",
            colors::file_path(&root.display().to_string()),
            if args.dry_run { " (dry run)" } else { "" }
        );
    }

    let pipeline = IngestPipeline::from_config(&config)?;
    let stats = if args.dry_run {
        pipeline.dry_run().await?
    } else {
        // The API key is only checked once the input has been walked
        pipeline
            .run_with(|| Ok(Services::new(config)?.embedder))
            .await?
    };

    let response = IngestResponse::new(&root, args.dry_run, stats);

    match format {
        OutputFormat::Human => print_human(&response),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn print_human(response: &IngestResponse) {
    println!(
        "{} {} files into {} chunks",
        colors::success(if response.dry_run { "Loaded" } else { "Ingested" }),
        colors::number(&response.files_loaded.to_string()),
        colors::number(&response.chunks_created.to_string())
    );
    println!(
        "Estimated throttle time: {}",
        colors::number(&format_duration(response.estimated_wait_secs as f64))
    );

    match &response.index_dir {
        Some(dir) => println!(
            "Saved {} vectors to {} in {}",
            colors::number(&response.chunks_embedded.to_string()),
            colors::file_path(dir),
            colors::number(&format_duration(response.duration_secs))
        ),
        None => println!("{}", colors::dim("Dry run: nothing embedded or saved")),
    }
}
