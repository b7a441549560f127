//! jobscan CLI
//!
//! Local execution entry point. For AWS Lambda, use `jobscan-lambda`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use jobscan::{
    config::load_config,
    error::Result,
    pipeline,
    services::BatchOutcome,
    storage::{LocalStorage, QueueStore, WriteOutcome},
    utils::http,
};

/// jobscan - Job posting keyword scanner
#[derive(Parser, Debug)]
#[command(name = "jobscan", version, about = "Job posting keyword scanner")]
struct Cli {
    /// Directory holding config.toml and the pending queue
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover job links and replace the pending queue
    Collect,

    /// Scan one batch of the pending queue
    Process,

    /// Discover and scan in one go, printing matches as JSON
    Search {
        /// Job search results URL
        #[arg(long)]
        url: String,

        /// Keyword to look for (repeatable)
        #[arg(short, long = "keyword", required = true)]
        keywords: Vec<String>,

        /// Maximum number of postings to scan (default: batch.max_links)
        #[arg(long)]
        max_links: Option<usize>,
    },

    /// Validate configuration
    Validate,

    /// Show pending queue info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.storage_dir.join("config.toml");
    let config = load_config(&config_path)?;
    log::debug!("Loaded configuration from {}", config_path.display());

    let storage = LocalStorage::new(&cli.storage_dir);
    let store = QueueStore::new(Arc::new(storage), config.store.queue_key.clone());

    match cli.command {
        Command::Collect => {
            let client = http::create_async_client(&config.crawler)?;
            let summary = pipeline::run_collect(&config, &client, &store).await?;
            if summary.saved {
                log::info!("Saved {} links.", summary.links);
            } else {
                log::info!("No links found.");
            }
        }

        Command::Process => {
            let client = http::create_async_client(&config.crawler)?;
            let summary = pipeline::run_process(&config, &client, &store).await?;
            match summary.outcome {
                BatchOutcome::Exhausted => log::info!("No links left."),
                BatchOutcome::Processed(report) => {
                    log::info!(
                        "Processed {} links ({} matched, {} failed), {} left.",
                        report.scanned,
                        report.matched,
                        report.failed,
                        report.remaining.len()
                    );
                    if summary.write == Some(WriteOutcome::Conflict) {
                        log::warn!("Queue was modified concurrently; it was not updated.");
                    }
                }
            }
        }

        Command::Search {
            url,
            keywords,
            max_links,
        } => {
            let client = http::create_async_client(&config.crawler)?;
            let max_links = max_links.unwrap_or(config.batch.max_links);
            let matched =
                pipeline::run_search(&config, &client, &url, &keywords, max_links).await?;
            println!("{}", serde_json::to_string_pretty(&matched)?);
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            // load_config already validated; report what is in effect.
            log::info!("✓ Config OK");
            log::info!(
                "  search_url: {}",
                config.search.search_url.as_deref().unwrap_or("(not set)")
            );
            log::info!("  keywords: {}", config.keywords.join(", "));
            log::info!(
                "  batch_size: {}, max_links: {}, page_count: {}",
                config.batch.batch_size,
                config.batch.max_links,
                config.search.page_count
            );
        }

        Command::Info => {
            let snapshot = store.read().await?;
            log::info!("Storage directory: {}", cli.storage_dir.display());
            log::info!("Queue key: {}", store.key());
            if snapshot.queue.is_empty() {
                log::info!("No links pending.");
            } else {
                log::info!("{} links pending.", snapshot.queue.len());
                for link in snapshot.queue.links().iter().take(5) {
                    log::info!("    {}", link);
                }
            }
        }
    }

    Ok(())
}
