// src/services/scanner.rs

//! Keyword scanner service.
//!
//! Visits one job posting and reports which keywords its description
//! mentions. Scanning never fails from the caller's point of view: anything
//! that goes wrong is reported as [`ScanOutcome::Failed`] and counts as no
//! match.

use std::time::Duration;

use reqwest::Client;
use scraper::Html;

use crate::models::{KeywordSet, MatchResult, SiteSelectors};
use crate::utils::http::fetch_html;

/// Result of scanning a single job posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// At least one keyword occurs in the description
    Match(MatchResult),
    /// Description found, but no keyword occurs in it
    NoMatch,
    /// Page could not be fetched or has no description region
    Failed(String),
}

impl ScanOutcome {
    /// The match, if any. Failures collapse into `None`.
    pub fn into_match(self) -> Option<MatchResult> {
        match self {
            Self::Match(result) => Some(result),
            Self::NoMatch | Self::Failed(_) => None,
        }
    }
}

/// Service for scanning job postings for keywords.
pub struct KeywordScanner<'a> {
    client: &'a Client,
    selectors: &'a SiteSelectors,
    delay: Duration,
}

impl<'a> KeywordScanner<'a> {
    /// Create a scanner that waits `delay` before every page request.
    pub fn new(client: &'a Client, selectors: &'a SiteSelectors, delay: Duration) -> Self {
        Self {
            client,
            selectors,
            delay,
        }
    }

    /// Fetch `link` and check its description for `keywords`.
    pub async fn scan(&self, link: &str, keywords: &KeywordSet) -> ScanOutcome {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let outcome = match fetch_html(self.client, link).await {
            Ok(document) => scan_document(&document, link, keywords, self.selectors),
            Err(e) => ScanOutcome::Failed(e.to_string()),
        };

        if let ScanOutcome::Failed(reason) = &outcome {
            log::warn!("Could not check page {link}. Reason: {reason}");
        }
        outcome
    }
}

/// Check an already parsed posting page for keywords.
pub fn scan_document(
    document: &Html,
    link: &str,
    keywords: &KeywordSet,
    selectors: &SiteSelectors,
) -> ScanOutcome {
    let Some(description) = document.select(&selectors.description).next() else {
        return ScanOutcome::Failed("description region not found".to_string());
    };

    let text = description.text().collect::<String>().to_lowercase();
    let found_keywords = keywords.found_in(&text);
    if found_keywords.is_empty() {
        return ScanOutcome::NoMatch;
    }

    let title = document
        .select(&selectors.title)
        .next()
        .map(|el| selectors.clean_title(&el.text().collect::<String>()))
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| link.to_string());

    ScanOutcome::Match(MatchResult {
        title,
        link: link.to_string(),
        found_keywords,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SiteConfig;

    const LINK: &str = "https://example.com/job/1";

    fn selectors() -> SiteSelectors {
        SiteSelectors::from_config(&SiteConfig {
            description_selector: "div#desc".to_string(),
            ..SiteConfig::default()
        })
        .unwrap()
    }

    fn page(title: Option<&str>, description: Option<&str>) -> Html {
        let head = title.map(|t| format!("<title>{t}</title>")).unwrap_or_default();
        let body = description
            .map(|d| format!(r#"<div id="desc">{d}</div>"#))
            .unwrap_or_default();
        Html::parse_document(&format!(
            "<html><head>{head}</head><body><p>Python in the sidebar</p>{body}</body></html>"
        ))
    }

    #[test]
    fn matches_case_insensitively_in_caller_order() {
        let keywords = KeywordSet::new(["remote", "python", "go"]);
        let doc = page(
            Some("Backend Engineer - Indeed.com"),
            Some("We write <b>PYTHON</b>. Fully Remote."),
        );
        let outcome = scan_document(&doc, LINK, &keywords, &selectors());
        assert_eq!(
            outcome,
            ScanOutcome::Match(MatchResult {
                title: "Backend Engineer".to_string(),
                link: LINK.to_string(),
                found_keywords: vec!["remote".to_string(), "python".to_string()],
            })
        );
    }

    #[test]
    fn only_the_description_region_is_searched() {
        let keywords = KeywordSet::new(["python"]);
        let doc = page(Some("Job"), Some("Java and Kotlin"));
        assert_eq!(
            scan_document(&doc, LINK, &keywords, &selectors()),
            ScanOutcome::NoMatch
        );
    }

    #[test]
    fn missing_description_is_a_failure_not_a_match() {
        let keywords = KeywordSet::new(["python"]);
        let doc = page(Some("Job"), None);
        let outcome = scan_document(&doc, LINK, &keywords, &selectors());
        assert!(matches!(outcome, ScanOutcome::Failed(_)));
        assert!(outcome.into_match().is_none());
    }

    #[test]
    fn title_falls_back_to_link() {
        let keywords = KeywordSet::new(["rust"]);
        let doc = page(None, Some("Rust services"));
        let result = scan_document(&doc, LINK, &keywords, &selectors())
            .into_match()
            .unwrap();
        assert_eq!(result.title, LINK);
    }
}
