// src/pipeline/process.rs

//! Batch processing: second phase of the scheduled batch shape.

use std::time::Duration;

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{Config, KeywordSet, SiteSelectors};
use crate::services::{BatchOutcome, BatchProcessor, KeywordScanner};
use crate::storage::{QueueStore, WriteOutcome};

/// Outcome of one batch invocation, including the queue write-back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSummary {
    pub outcome: BatchOutcome,
    /// `None` when the queue was already empty and nothing was written
    pub write: Option<WriteOutcome>,
}

/// Read the pending queue, scan one batch, and write the remainder back.
pub async fn run_process(
    config: &Config,
    client: &Client,
    store: &QueueStore,
) -> Result<ProcessSummary> {
    let keywords = KeywordSet::new(&config.keywords);
    if keywords.is_empty() {
        return Err(AppError::config("No keywords configured"));
    }

    log::info!(
        "Checking for keywords: {}",
        keywords.iter().collect::<Vec<_>>().join(", ")
    );
    let snapshot = store.read().await?;
    let selectors = SiteSelectors::from_config(&config.site)?;
    let scanner = KeywordScanner::new(
        client,
        &selectors,
        Duration::from_millis(config.crawler.request_delay_ms),
    );
    let processor = BatchProcessor::new(&scanner, config.batch.batch_size);

    let outcome = processor.process(snapshot.queue, &keywords).await;
    if outcome == BatchOutcome::Exhausted {
        return Ok(ProcessSummary {
            outcome,
            write: None,
        });
    }

    let remaining = outcome.remaining();
    let write = if config.store.conditional_writes {
        store
            .write_if_unchanged(&remaining, snapshot.version.as_deref())
            .await?
    } else {
        store.write(&remaining).await?;
        WriteOutcome::Written
    };

    if write == WriteOutcome::Conflict {
        log::warn!(
            "Queue '{}' changed during this batch; remaining links were not written back",
            store.key()
        );
    }

    Ok(ProcessSummary {
        outcome,
        write: Some(write),
    })
}
