// src/pipeline/search.rs

//! Synchronous search: discover and scan within one call.

use std::time::Duration;

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{Config, KeywordSet, MatchResult, SiteSelectors};
use crate::services::{KeywordScanner, LinkDiscovery};

/// Find job postings under `search_url` that mention any of `keywords`.
///
/// At most `max_links` discovered links are scanned, taken in discovery
/// order. Input is validated before any request is made.
pub async fn run_search<S: AsRef<str>>(
    config: &Config,
    client: &Client,
    search_url: &str,
    keywords: &[S],
    max_links: usize,
) -> Result<Vec<MatchResult>> {
    let keywords = KeywordSet::new(keywords);
    if search_url.trim().is_empty() || keywords.is_empty() {
        return Err(AppError::invalid_input("Missing search_url or keywords."));
    }

    let selectors = SiteSelectors::from_config(&config.site)?;
    let discovery = LinkDiscovery::new(client, &selectors, &config.search);
    let mut links = discovery
        .discover(search_url.trim(), config.search.page_count)
        .await?;

    let found = links.len();
    links.truncate(max_links);
    log::info!(
        "Found {} links, processing the first {}.",
        found,
        links.len()
    );

    let scanner = KeywordScanner::new(
        client,
        &selectors,
        Duration::from_millis(config.crawler.request_delay_ms),
    );

    let mut matched = Vec::new();
    for link in &links {
        if let Some(result) = scanner.scan(link, &keywords).await.into_match() {
            matched.push(result);
        }
    }

    log::info!("Found {} matching jobs.", matched.len());
    Ok(matched)
}
