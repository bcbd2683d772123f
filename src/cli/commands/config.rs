//! Config command - show current configuration

use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::embedding::openai::API_KEY_ENV;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Also show where configuration was looked up
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<String>,
    pub api_key_set: bool,
    pub config: Config,
}

impl ConfigResponse {
    pub fn new(config: &Config, all: bool) -> Self {
        let config_file = all.then(|| XdgDirs::new().config_file().display().to_string());
        let api_key_set = std::env::var(API_KEY_ENV)
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false);

        Self {
            config_file,
            api_key_set,
            config: config.clone(),
        }
    }
}

/// Execute the config command
pub fn execute(
    args: ConfigArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = ConfigResponse::new(config, args.all);

    match format {
        OutputFormat::Human => {
            let c = &response.config;
            println!("Configuration:");
            if let Some(file) = &response.config_file {
                println!("  config_file: {file}");
            }
            println!("  input:");
            println!("    root_dir: {}", c.input.root_dir.display());
            println!("    extractor: {}", c.input.extractor);
            println!("    include_patterns: {:?}", c.input.include_patterns);
            println!("    exclude_patterns: {:?}", c.input.exclude_patterns);
            println!("  chunking:");
            println!("    chunk_size: {}", c.chunking.chunk_size);
            println!("    chunk_overlap: {}", c.chunking.chunk_overlap);
            println!("  embedding:");
            println!("    base_url: {}", c.embedding.base_url);
            println!("    model: {}", c.embedding.model);
            if let Some(dims) = c.embedding.dimensions {
                println!("    dimensions: {dims}");
            }
            println!("    strip_new_lines: {}", c.embedding.strip_new_lines);
            if let Some(secs) = c.embedding.timeout_secs {
                println!("    timeout_secs: {secs}");
            }
            println!("    {API_KEY_ENV} set: {}", response.api_key_set);
            println!("  rate_limit: {}", c.rate_limit);
            println!("  output:");
            println!("    index_dir: {}", c.output.index_dir.display());
            println!("    space: {}", c.output.space);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
