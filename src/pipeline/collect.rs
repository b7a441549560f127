// src/pipeline/collect.rs

//! Link collection: first phase of the scheduled batch shape.

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{Config, PendingQueue, SiteSelectors};
use crate::services::LinkDiscovery;
use crate::storage::QueueStore;

/// What a collection run found and stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectSummary {
    /// Unique links discovered
    pub links: usize,
    /// Whether the pending queue was replaced
    pub saved: bool,
}

/// Discover job links for the configured search and replace the pending queue.
///
/// An empty result leaves the existing queue untouched.
pub async fn run_collect(
    config: &Config,
    client: &Client,
    store: &QueueStore,
) -> Result<CollectSummary> {
    let search_url = config
        .search
        .search_url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| AppError::config("search.search_url is not set (SEARCH_URL)"))?;

    let selectors = SiteSelectors::from_config(&config.site)?;
    let discovery = LinkDiscovery::new(client, &selectors, &config.search);
    let links = discovery
        .discover(search_url, config.search.page_count)
        .await?;

    if links.is_empty() {
        log::warn!("No job links found. Check your URL and HTML selector.");
        return Ok(CollectSummary {
            links: 0,
            saved: false,
        });
    }

    log::info!("Found {} unique job links.", links.len());
    let count = links.len();
    store.write(&PendingQueue::new(links)).await?;
    log::info!("Saved links to queue '{}'.", store.key());

    Ok(CollectSummary {
        links: count,
        saved: true,
    })
}
