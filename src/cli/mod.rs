//! CLI adapter for docingest
//!
//! Parses arguments with clap, loads configuration and dispatches to
//! the command implementations. Depends on `core/`; nothing in `core/`
//! depends on it.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// docingest - build a similarity-search index from a document tree
///
/// Walks a directory, strips Markdown or HTML markup, splits the text
/// into overlapping chunks and embeds every chunk into a vector index.
/// Running without a subcommand performs `ingest` with the loaded
/// configuration.
#[derive(Parser, Debug)]
#[command(name = "docingest")]
#[command(version)]
#[command(about = "Document ingestion for similarity search", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Walk, chunk, embed and save the index (default)
    Ingest(commands::IngestArgs),

    /// Query a saved index for the nearest chunks
    Search(commands::SearchArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  docingest completions bash > ~/.local/share/bash-completion/completions/docingest
    ///   zsh:   docingest completions zsh > ~/.zfunc/_docingest
    ///   fish:  docingest completions fish > ~/.config/fish/completions/docingest.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Ingest(commands::IngestArgs::default()));

    // Handle completions command early (doesn't need configuration)
    if let Commands::Completions(args) = command {
        return commands::completions::execute(args);
    }

    let config = Config::load()?;
    config.log_config();

    match command {
        Commands::Ingest(args) => commands::ingest::execute(args, config, cli.format).await,
        Commands::Search(args) => commands::search::execute(args, config, cli.format).await,
        Commands::ShowConfig(args) => commands::config::execute(args, &config, cli.format),
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
