// src/models/mod.rs

//! Domain models for the job scanner.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod job;
mod selectors;

// Re-export all public types
pub use config::{
    BatchConfig, Config, CrawlerConfig, MIN_REQUEST_DELAY_MS, SearchConfig, SiteConfig,
    StoreConfig,
};
pub use job::{JobLink, KeywordSet, MatchResult, PendingQueue};
pub use selectors::{SiteSelectors, parse_selector};
