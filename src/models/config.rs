//! Application configuration structures.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::SiteSelectors;

/// Shortest politeness delay a validated configuration may use.
pub const MIN_REQUEST_DELAY_MS: u64 = 500;

/// Upper bounds for result pagination.
pub const MAX_PAGE_COUNT: usize = 100;
pub const MAX_PAGE_SIZE: usize = 1000;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and politeness settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Target-site selectors
    #[serde(default)]
    pub site: SiteConfig,

    /// Search page and pagination
    #[serde(default)]
    pub search: SearchConfig,

    /// Per-invocation safety valves
    #[serde(default)]
    pub batch: BatchConfig,

    /// Keywords for the scheduled batch shape
    #[serde(default = "defaults::keywords")]
    pub keywords: Vec<String>,

    /// Pending-queue store settings
    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup (environment variables in production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("SEARCH_URL") {
            self.search.search_url = Some(v);
        }
        if let Some(v) = lookup("USER_AGENT") {
            self.crawler.user_agent = v;
        }
        if let Some(v) = lookup("LINK_SELECTOR") {
            self.site.link_selector = v;
        }
        if let Some(v) = lookup("DESCRIPTION_SELECTOR") {
            self.site.description_selector = v;
        }
        if let Some(v) = lookup("BASE_URL") {
            self.site.base_url = v;
        }
        if let Some(v) = lookup("QUEUE_KEY") {
            self.store.queue_key = v;
        }
        if let Some(v) = lookup("KEYWORDS") {
            self.keywords = v
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect();
        }

        override_parsed(&lookup, "BATCH_SIZE", &mut self.batch.batch_size);
        override_parsed(&lookup, "MAX_LINKS", &mut self.batch.max_links);
        override_parsed(&lookup, "PAGE_COUNT", &mut self.search.page_count);
        override_parsed(&lookup, "PAGE_SIZE", &mut self.search.page_size);
        override_parsed(&lookup, "REQUEST_DELAY_MS", &mut self.crawler.request_delay_ms);
        override_parsed(&lookup, "CRAWL_TIMEOUT_SECS", &mut self.crawler.timeout_secs);
        override_parsed(&lookup, "CONDITIONAL_WRITES", &mut self.store.conditional_writes);
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.request_delay_ms < MIN_REQUEST_DELAY_MS {
            return Err(AppError::validation(format!(
                "crawler.request_delay_ms must be >= {MIN_REQUEST_DELAY_MS}"
            )));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.search.page_size) {
            return Err(AppError::validation(format!(
                "search.page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        if !(1..=MAX_PAGE_COUNT).contains(&self.search.page_count) {
            return Err(AppError::validation(format!(
                "search.page_count must be between 1 and {MAX_PAGE_COUNT}"
            )));
        }
        if self.search.offset_param.trim().is_empty() {
            return Err(AppError::validation("search.offset_param is empty"));
        }
        if let Some(search_url) = &self.search.search_url {
            Url::parse(search_url)?;
        }
        if self.batch.batch_size == 0 {
            return Err(AppError::validation("batch.batch_size must be > 0"));
        }
        if self.batch.max_links == 0 {
            return Err(AppError::validation("batch.max_links must be > 0"));
        }
        if self.store.queue_key.trim().is_empty() {
            return Err(AppError::validation("store.queue_key is empty"));
        }
        if self.site.base_url.starts_with('/') || Url::parse(&self.site.base_url).is_err() {
            return Err(AppError::validation(format!(
                "site.base_url '{}' is not an absolute URL",
                self.site.base_url
            )));
        }
        if let Some(pattern) = &self.site.title_suffix_pattern {
            Regex::new(pattern).map_err(|e| {
                AppError::validation(format!("site.title_suffix_pattern is invalid: {e}"))
            })?;
        }
        SiteSelectors::from_config(&self.site)?;
        Ok(())
    }
}

fn override_parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    target: &mut T,
) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *target = value,
        Err(_) => log::warn!("Ignoring {key}={raw:?}: not a valid value"),
    }
}

/// HTTP client and politeness settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header identifying the bot to the target site
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Pause before each job-posting fetch in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// Structural selectors for one target site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Selector for job-posting links on a results page
    #[serde(default = "defaults::link_selector")]
    pub link_selector: String,

    /// Selector for the description region on a posting page
    #[serde(default = "defaults::description_selector")]
    pub description_selector: String,

    /// Prefix for root-relative links
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// HTML attribute holding the link (usually "href")
    #[serde(default = "defaults::link_attr")]
    pub link_attr: String,

    /// Regex removed from the end of page titles
    #[serde(default = "defaults::title_suffix_pattern")]
    pub title_suffix_pattern: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            link_selector: defaults::link_selector(),
            description_selector: defaults::description_selector(),
            base_url: defaults::base_url(),
            link_attr: defaults::link_attr(),
            title_suffix_pattern: defaults::title_suffix_pattern(),
        }
    }
}

/// Search page and pagination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Results page for the scheduled batch shape
    #[serde(default)]
    pub search_url: Option<String>,

    /// Results per page on the target site
    #[serde(default = "defaults::page_size")]
    pub page_size: usize,

    /// Number of result pages to walk
    #[serde(default = "defaults::page_count")]
    pub page_count: usize,

    /// Query parameter carrying the result offset
    #[serde(default = "defaults::offset_param")]
    pub offset_param: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_url: None,
            page_size: defaults::page_size(),
            page_count: defaults::page_count(),
            offset_param: defaults::offset_param(),
        }
    }
}

/// Limits bounding the work of one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Queued links scanned per batch invocation
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,

    /// Links scanned per synchronous search
    #[serde(default = "defaults::max_links")]
    pub max_links: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: defaults::batch_size(),
            max_links: defaults::max_links(),
        }
    }
}

/// Pending-queue store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Key holding the pending links
    #[serde(default = "defaults::queue_key")]
    pub queue_key: String,

    /// Write back only if the queue is unchanged since it was read
    #[serde(default)]
    pub conditional_writes: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            queue_key: defaults::queue_key(),
            conditional_writes: false,
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "jobscan/0.1 (job keyword scanner; contact: set USER_AGENT)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        1000
    }

    // Site defaults
    pub fn link_selector() -> String {
        "a.jcs-JobTitle".into()
    }
    pub fn description_selector() -> String {
        "div#jobDescriptionText".into()
    }
    pub fn base_url() -> String {
        "https://www.indeed.com".into()
    }
    pub fn link_attr() -> String {
        "href".into()
    }
    pub fn title_suffix_pattern() -> Option<String> {
        Some(r"\s*[-|]\s*Indeed\.com\s*$".into())
    }

    // Search defaults
    pub fn page_size() -> usize {
        10
    }
    pub fn page_count() -> usize {
        1
    }
    pub fn offset_param() -> String {
        "start".into()
    }

    // Batch defaults
    pub fn batch_size() -> usize {
        5
    }
    pub fn max_links() -> usize {
        15
    }

    pub fn keywords() -> Vec<String> {
        ["python", "django", "fastapi", "aws", "remote"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    // Store defaults
    pub fn queue_key() -> String {
        "links_to_process".into()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn default_keywords_are_populated() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.keywords.len(), 5);
        assert_eq!(config.store.queue_key, "links_to_process");
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.crawler.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_short_politeness_delay() {
        let mut config = Config::default();
        config.crawler.request_delay_ms = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_batch_size() {
        let mut config = Config::default();
        config.batch.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_caps_pagination() {
        let mut config = Config::default();
        let huge = usize::MAX.to_string();
        config.apply_overrides(lookup_from(&[("PAGE_SIZE", huge.as_str())]));
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.search.page_count = MAX_PAGE_COUNT + 1;
        assert!(config.validate().is_err());

        config.search.page_count = MAX_PAGE_COUNT;
        config.search.page_size = MAX_PAGE_SIZE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_relative_base_url() {
        let mut config = Config::default();
        config.site.base_url = "/jobs".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_selector() {
        let mut config = Config::default();
        config.site.link_selector = "[[invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_toml_sections() {
        let config: Config = toml::from_str(
            r##"
            keywords = ["rust"]

            [site]
            link_selector = "a.job"
            description_selector = "#desc"
            base_url = "https://jobs.example.com"

            [batch]
            batch_size = 3
            "##,
        )
        .unwrap();
        assert_eq!(config.keywords, vec!["rust"]);
        assert_eq!(config.site.link_selector, "a.job");
        assert_eq!(config.site.description_selector, "#desc");
        assert_eq!(config.site.link_attr, "href");
        assert_eq!(config.batch.batch_size, 3);
        assert_eq!(config.batch.max_links, 15);
    }

    #[test]
    fn overrides_apply_strings_numbers_and_lists() {
        let mut config = Config::default();
        config.apply_overrides(lookup_from(&[
            ("SEARCH_URL", "https://example.com/jobs?q=rust"),
            ("BATCH_SIZE", "2"),
            ("KEYWORDS", "Rust, tokio ,,"),
            ("CONDITIONAL_WRITES", "true"),
        ]));
        assert_eq!(
            config.search.search_url.as_deref(),
            Some("https://example.com/jobs?q=rust")
        );
        assert_eq!(config.batch.batch_size, 2);
        assert_eq!(config.keywords, vec!["Rust", "tokio"]);
        assert!(config.store.conditional_writes);
    }

    #[test]
    fn overrides_ignore_unparseable_numbers() {
        let mut config = Config::default();
        config.apply_overrides(lookup_from(&[("MAX_LINKS", "lots")]));
        assert_eq!(config.batch.max_links, 15);
    }
}
