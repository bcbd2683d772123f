//! Search command - query a saved index

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::services::Services;
use crate::core::types::SearchHit;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to search for
    pub query: String,

    /// Maximum number of results (1-100)
    #[arg(long, short = 'k', default_value = "4")]
    pub limit: usize,

    /// Index directory (overrides `output.index_dir`)
    #[arg(long)]
    pub index: Option<PathBuf>,

    /// Only show source paths (no content)
    #[arg(long)]
    pub files_only: bool,
}

/// Search result item
#[derive(Debug, Serialize)]
pub struct SearchResultItem {
    pub rank: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub distance: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchResponseOutput {
    pub query: String,
    pub index_dir: String,
    pub total_results: usize,
    pub results: Vec<SearchResultItem>,
}

impl SearchResponseOutput {
    pub fn new(query: &str, index_dir: &std::path::Path, hits: Vec<SearchHit>, files_only: bool) -> Self {
        let results: Vec<_> = hits
            .into_iter()
            .enumerate()
            .map(|(i, hit)| SearchResultItem {
                rank: i + 1,
                source: hit.document.source().map(str::to_string),
                distance: hit.distance,
                text: if files_only {
                    None
                } else {
                    Some(hit.document.page_content)
                },
            })
            .collect();

        Self {
            query: query.to_string(),
            index_dir: index_dir.display().to_string(),
            total_results: results.len(),
            results,
        }
    }
}

/// Execute the search command
pub async fn execute(
    args: SearchArgs,
    config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.query.trim().is_empty() {
        return Err("Search query cannot be empty.".into());
    }

    let limit = args.limit.clamp(1, 100);
    let index_dir = args
        .index
        .clone()
        .unwrap_or_else(|| config.output.index_dir.clone());

    let services = Services::new(config)?;
    let hits = services.search(&index_dir, &args.query, limit).await?;
    let output = SearchResponseOutput::new(&args.query, &index_dir, hits, args.files_only);

    match format {
        OutputFormat::Human => {
            if output.results.is_empty() {
                println!(
                    "No results found for '{}' in {}",
                    colors::label(&args.query),
                    colors::file_path(&output.index_dir)
                );
            } else {
                println!(
                    "Found {} result(s) in {}:\n",
                    colors::number(&output.total_results.to_string()),
                    colors::file_path(&output.index_dir)
                );

                for result in &output.results {
                    let source = result.source.as_deref().unwrap_or("<unknown>");
                    if args.files_only {
                        println!("{}", colors::file_path(source));
                        continue;
                    }

                    println!(
                        "[{}] {} {}",
                        colors::rank(&result.rank.to_string()),
                        colors::file_path(source),
                        colors::dim(&format!("(distance: {:.4})", result.distance))
                    );
                    if let Some(text) = &result.text {
                        // Indent and truncate text for display
                        for line in text.lines().take(5) {
                            let truncated = if line.chars().count() > 100 {
                                let head: String = line.chars().take(97).collect();
                                format!("{head}...")
                            } else {
                                line.to_string()
                            };
                            println!("    {}", colors::dim(&truncated));
                        }
                    }
                    println!();
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
