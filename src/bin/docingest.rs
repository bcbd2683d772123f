//! docingest - build a similarity-search index from a document tree
//!
//! # Examples
//!
//! ```bash
//! # Ingest ./ingest/markdown into ./data with the configured throttle
//! docingest
//!
//! # Count files and chunks without calling the embedding service
//! docingest ingest --root docs --dry-run
//!
//! # Query the saved index
//! docingest search "how do I configure retries" -k 3
//!
//! # Show configuration
//! docingest show-config
//! ```

use clap::Parser;
use docingest::cli::{output, run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays clean for --format json
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docingest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}
