//! AWS Lambda entry point for jobscan
//!
//! Deploy with `cargo lambda build --release --features lambda`.
//!
//! ## Environment Variables
//!
//! - `JOBSCAN_TASK`: `collect`, `process`, `search` or `ping`
//! - `S3_BUCKET` / `S3_PREFIX`: where the pending queue is stored
//! - `CONFIG_PATH`: optional bundled TOML configuration
//! - `SEARCH_URL`, `KEYWORDS`, `BATCH_SIZE`, `MAX_LINKS`, `PAGE_COUNT`, ...:
//!   configuration overrides
//! - `RUST_LOG`: Log level (e.g., `info`, `debug`)

use jobscan::lambda::{Task, handler};
use lambda_runtime::{Error as LambdaError, service_fn};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let task = Task::from_env()?;
    info!("jobscan Lambda starting with task '{}'", task);

    lambda_runtime::run(service_fn(move |event| handler(task, event))).await
}
