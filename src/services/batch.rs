// src/services/batch.rs

//! Batch processor for the pending-link queue.

use crate::models::{KeywordSet, PendingQueue};
use crate::services::{KeywordScanner, ScanOutcome};

/// Counts from one processed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Links taken off the queue and scanned
    pub scanned: usize,
    /// Scanned links whose description matched
    pub matched: usize,
    /// Scanned links that could not be checked
    pub failed: usize,
    /// Queue to persist for the next invocation
    pub remaining: PendingQueue,
}

/// Result of one batch invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The queue was already empty; nothing was scanned
    Exhausted,
    /// A batch was scanned
    Processed(BatchReport),
}

impl BatchOutcome {
    /// The queue left after this invocation.
    pub fn remaining(&self) -> PendingQueue {
        match self {
            Self::Exhausted => PendingQueue::default(),
            Self::Processed(report) => report.remaining.clone(),
        }
    }
}

/// Scans a fixed-size prefix of the pending queue.
///
/// Matches only go to the log; the caller gets back the shorter queue.
pub struct BatchProcessor<'a> {
    scanner: &'a KeywordScanner<'a>,
    batch_size: usize,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(scanner: &'a KeywordScanner<'a>, batch_size: usize) -> Self {
        Self {
            scanner,
            batch_size: batch_size.max(1),
        }
    }

    /// Scan the first `batch_size` links and return what is left.
    pub async fn process(&self, queue: PendingQueue, keywords: &KeywordSet) -> BatchOutcome {
        if queue.is_empty() {
            log::info!("No links to process. All jobs checked.");
            return BatchOutcome::Exhausted;
        }

        log::info!("{} links remaining.", queue.len());
        let (batch, remaining) = queue.split_batch(self.batch_size);
        let mut report = BatchReport {
            remaining,
            ..BatchReport::default()
        };

        for link in &batch {
            log::info!("Checking: {link}");
            report.scanned += 1;
            match self.scanner.scan(link, keywords).await {
                ScanOutcome::Match(result) => {
                    report.matched += 1;
                    log::info!(
                        "MATCH FOUND: {} ({}) keywords: {}",
                        result.link,
                        result.title,
                        result.found_keywords.join(", ")
                    );
                }
                ScanOutcome::NoMatch => {}
                ScanOutcome::Failed(_) => report.failed += 1,
            }
        }

        log::info!(
            "Batch complete. {} links left to process.",
            report.remaining.len()
        );
        BatchOutcome::Processed(report)
    }
}
