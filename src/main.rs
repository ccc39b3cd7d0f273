//! # CEX Search CLI (`cex`)
//!
//! ## Usage
//!
//! ```bash
//! cex --config ./config/cex.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cex serve` | Start the HTTP server |
//! | `cex check` | Fetch and parse the corpus once, print a summary |
//! | `cex search "<query>"` | Fetch, parse and search the corpus once |
//!
//! Logs go to stderr; set `RUST_LOG` to adjust verbosity.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cex_search::config;
use cex_search::fetch::source_from_config;
use cex_search::ingest::{digest_hex, load_corpus};
use cex_search::server;
use cex_search_core::query;

/// CEX Search: substring search over a CEX corpus of CTS passages.
#[derive(Parser)]
#[command(name = "cex", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/cex.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    ///
    /// Binds to `[server].bind` and serves `/search`, `/reload` and `/health`.
    Serve,

    /// Fetch and parse the corpus once and print a summary.
    Check {
        /// Print the parsed corpus as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Fetch and parse the corpus once, then list passages containing QUERY.
    Search {
        /// Exact, case-sensitive substring to look for.
        query: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cex_search=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Check { json } => {
            let source = source_from_config(&cfg.source)?;
            let (corpus, raw) = load_corpus(source.as_ref())
                .await
                .with_context(|| format!("Failed to load corpus from {}", source.describe()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&corpus)?);
            } else {
                println!("source: {}", source.describe());
                println!("  works: {}", corpus.work_count());
                println!("  passages: {}", corpus.passage_count());
                println!("  bytes: {}", raw.len());
                println!("  sha256: {}", digest_hex(&raw));
                println!("ok");
            }
        }
        Commands::Search { query } => {
            // Reject before any network traffic.
            if query.is_empty() {
                anyhow::bail!("Search query must not be empty");
            }

            let source = source_from_config(&cfg.source)?;
            let (corpus, _) = load_corpus(source.as_ref())
                .await
                .with_context(|| format!("Failed to load corpus from {}", source.describe()))?;

            let results = query::search(&corpus, &query)?;
            match results.count {
                0 => println!("No matching passages."),
                1 => println!("1 matching passage:"),
                n => println!("{} matching passages:", n),
            }
            for id in &results.passages {
                println!("{}", id);
            }
        }
    }

    Ok(())
}
