// src/services/discovery.rs

//! Job link discovery service.
//!
//! Walks the result pages of a job search and collects the posting links.

use std::collections::HashSet;

use reqwest::Client;
use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::{JobLink, SearchConfig, SiteSelectors};
use crate::utils::{http::fetch_html, normalize_href, paginate};

/// Service for discovering job-posting links on search result pages.
pub struct LinkDiscovery<'a> {
    client: &'a Client,
    selectors: &'a SiteSelectors,
    search: &'a SearchConfig,
}

impl<'a> LinkDiscovery<'a> {
    /// Create a new link discovery service.
    pub fn new(client: &'a Client, selectors: &'a SiteSelectors, search: &'a SearchConfig) -> Self {
        Self {
            client,
            selectors,
            search,
        }
    }

    /// Collect unique job links from the first `page_count` result pages.
    ///
    /// Links come back in first-seen order. A failure on the first page is
    /// fatal; later pages that fail contribute nothing.
    pub async fn discover(&self, search_url: &str, page_count: usize) -> Result<Vec<JobLink>> {
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for page in 0..page_count.max(1) {
            let Some(offset) = page.checked_mul(self.search.page_size) else {
                log::warn!("Result offset overflows after page {page}; stopping");
                break;
            };
            let page_url = paginate(search_url, &self.search.offset_param, offset);
            log::debug!("Fetching results page {}: {}", page + 1, page_url);

            let page_links = match fetch_html(self.client, &page_url).await {
                Ok(document) => extract_links(&document, self.selectors),
                Err(e) if page == 0 => {
                    log::error!("Error fetching main page {page_url}: {e}");
                    return Err(AppError::upstream(search_url, e));
                }
                Err(e) => {
                    log::warn!("Skipping results page {} ({page_url}): {e}", page + 1);
                    continue;
                }
            };

            log::debug!("Page {} yielded {} links", page + 1, page_links.len());
            for link in page_links {
                if seen.insert(link.clone()) {
                    links.push(link);
                }
            }
        }

        Ok(links)
    }
}

/// Extract normalized job links from a results page, in document order.
pub fn extract_links(document: &Html, selectors: &SiteSelectors) -> Vec<JobLink> {
    document
        .select(&selectors.link)
        .filter_map(|element| element.value().attr(&selectors.link_attr))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(|href| normalize_href(&selectors.base_url, href))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SiteConfig;

    fn selectors() -> SiteSelectors {
        SiteSelectors::from_config(&SiteConfig {
            link_selector: "a.job".to_string(),
            base_url: "https://example.com".to_string(),
            ..SiteConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn extracts_and_normalizes_links() {
        let html = Html::parse_document(
            r#"<html><body>
                <a class="job" href="/job/1">One</a>
                <a class="other" href="/ignored">Nope</a>
                <a class="job" href="https://other.com/job/2">Two</a>
                <a class="job">No href</a>
                <a class="job" href="  ">Blank</a>
            </body></html>"#,
        );
        assert_eq!(
            extract_links(&html, &selectors()),
            vec!["https://example.com/job/1", "https://other.com/job/2"]
        );
    }

    #[test]
    fn extract_keeps_duplicates_for_discover_to_collapse() {
        let html = Html::parse_document(
            r#"<a class="job" href="/job/1">A</a><a class="job" href="/job/1">A again</a>"#,
        );
        assert_eq!(extract_links(&html, &selectors()).len(), 2);
    }
}
