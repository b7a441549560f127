// src/models/selectors.rs

//! Compiled selectors for scraping one target site.

use regex::Regex;
use scraper::Selector;

use crate::error::{AppError, Result};
use crate::models::SiteConfig;

/// Parsed form of [`SiteConfig`], built once per invocation.
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    /// Job-posting links on a results page
    pub link: Selector,

    /// Description region on a posting page
    pub description: Selector,

    /// Page `<title>` element
    pub title: Selector,

    /// Attribute holding the link target
    pub link_attr: String,

    /// Prefix for root-relative links
    pub base_url: String,

    /// Trailing branding removed from titles
    pub title_suffix: Option<Regex>,
}

impl SiteSelectors {
    /// Compile the selectors of a site configuration.
    pub fn from_config(site: &SiteConfig) -> Result<Self> {
        let title_suffix = site
            .title_suffix_pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| AppError::config(format!("Invalid title suffix pattern: {e}")))?;

        Ok(Self {
            link: parse_selector(&site.link_selector)?,
            description: parse_selector(&site.description_selector)?,
            title: parse_selector("title")?,
            link_attr: site.link_attr.clone(),
            base_url: site.base_url.clone(),
            title_suffix,
        })
    }

    /// Strip the configured suffix and surrounding whitespace from a page title.
    pub fn clean_title(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        match &self.title_suffix {
            Some(suffix) => suffix.replace(trimmed, "").trim().to_string(),
            None => trimmed.to_string(),
        }
    }
}

/// Parse a CSS selector, mapping failures into [`AppError::Selector`].
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selector_valid() {
        assert!(parse_selector("div#jobDescriptionText").is_ok());
        assert!(parse_selector("a.jcs-JobTitle").is_ok());
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(parse_selector("[[invalid").is_err());
    }

    #[test]
    fn clean_title_strips_branding_suffix() {
        let selectors = SiteSelectors::from_config(&SiteConfig::default()).unwrap();
        assert_eq!(
            selectors.clean_title("  Senior Rust Engineer - Remote - Indeed.com \n"),
            "Senior Rust Engineer - Remote"
        );
        assert_eq!(selectors.clean_title("Backend Developer"), "Backend Developer");
    }

    #[test]
    fn clean_title_without_pattern_only_trims() {
        let site = SiteConfig {
            title_suffix_pattern: None,
            ..SiteConfig::default()
        };
        let selectors = SiteSelectors::from_config(&site).unwrap();
        assert_eq!(selectors.clean_title(" Job | Indeed.com "), "Job | Indeed.com");
    }
}
