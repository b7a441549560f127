//! Service layer for the job scanner.
//!
//! This module contains the business logic for:
//! - Link discovery on search result pages (`LinkDiscovery`)
//! - Keyword scanning of job postings (`KeywordScanner`)
//! - Draining the pending queue in batches (`BatchProcessor`)

mod batch;
mod discovery;
mod scanner;

pub use batch::{BatchOutcome, BatchProcessor, BatchReport};
pub use discovery::{LinkDiscovery, extract_links};
pub use scanner::{KeywordScanner, ScanOutcome, scan_document};
