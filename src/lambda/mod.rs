// src/lambda/mod.rs

//! AWS Lambda handlers for the job scanner.
//!
//! One binary serves every task; `JOBSCAN_TASK` picks which:
//! - `collect`: discover job links and replace the pending queue in S3
//! - `process`: scan one batch of the pending queue
//! - `search`: HTTP-style request/response search (API Gateway or function URL)
//! - `ping`: deployment smoke check

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use lambda_runtime::{Error as LambdaError, LambdaEvent};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info, instrument};

use crate::config;
use crate::error::{AppError, Result};
use crate::models::{Config, MatchResult};
use crate::pipeline::{CollectSummary, ProcessSummary, run_collect, run_process, run_search};
use crate::services::BatchOutcome;
use crate::storage::s3::S3Storage;
use crate::storage::{QueueStore, WriteOutcome};
use crate::utils::http::create_async_client;

/// Generic message returned for unexpected failures.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

/// Which job this function instance performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Collect,
    Process,
    Search,
    Ping,
}

impl Task {
    /// Read the task from `JOBSCAN_TASK`.
    pub fn from_env() -> Result<Self> {
        let raw = std::env::var("JOBSCAN_TASK")
            .map_err(|_| AppError::config("JOBSCAN_TASK is not set"))?;
        raw.parse()
    }
}

impl FromStr for Task {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "collect" => Ok(Self::Collect),
            "process" => Ok(Self::Process),
            "search" => Ok(Self::Search),
            "ping" => Ok(Self::Ping),
            other => Err(AppError::config(format!("Unknown JOBSCAN_TASK '{other}'"))),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Collect => "collect",
            Self::Process => "process",
            Self::Search => "search",
            Self::Ping => "ping",
        };
        f.write_str(name)
    }
}

/// Terse status returned by the scheduled tasks.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: String,
}

impl StatusResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

/// HTTP-style invocation payload; only the body is used.
#[derive(Debug, Default, Deserialize)]
pub struct ApiRequest {
    #[serde(default)]
    pub body: Option<String>,
}

/// Search request carried in the request body.
#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub search_url: Option<String>,

    #[serde(default)]
    pub keywords: Vec<String>,
}

/// HTTP-style response understood by API Gateway and function URLs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl ApiResponse {
    fn json(status_code: u16, body: Value) -> Self {
        let headers = HashMap::from([(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )]);
        Self {
            status_code,
            headers,
            body: body.to_string(),
        }
    }

    /// Map a search result onto 200 / 400 / 500.
    ///
    /// Only caller errors expose their message; anything else is logged and
    /// answered with a generic message.
    pub fn from_search(result: Result<Vec<MatchResult>>) -> Self {
        match result {
            Ok(matched_jobs) => Self::json(200, json!({ "matched_jobs": matched_jobs })),
            Err(e) if e.is_caller_error() => {
                match &e {
                    AppError::Upstream { url, cause } => {
                        error!("Search page {} could not be fetched: {}", url, cause)
                    }
                    _ => info!("Rejected search request: {}", e),
                }
                Self::json(400, json!({ "error": e.to_string() }))
            }
            Err(e) => {
                error!("An unexpected error occurred: {}", e);
                Self::json(500, json!({ "error": INTERNAL_ERROR_MESSAGE }))
            }
        }
    }
}

/// Main Lambda handler function.
#[instrument(skip(event))]
pub async fn handler(
    task: Task,
    event: LambdaEvent<Value>,
) -> std::result::Result<Value, LambdaError> {
    let (payload, _context) = event.into_parts();
    info!("Running '{}' task", task);

    let response = match task {
        Task::Collect => serde_json::to_value(collect().await)?,
        Task::Process => serde_json::to_value(process().await)?,
        Task::Search => serde_json::to_value(search(payload).await)?,
        Task::Ping => json!({ "message": "Hello from jobscan! It works!" }),
    };

    Ok(response)
}

/// Discover links and replace the pending queue.
async fn collect() -> StatusResponse {
    match run_collect_task().await {
        Ok(summary) if summary.saved => {
            StatusResponse::success(format!("Saved {} links.", summary.links))
        }
        Ok(_) => StatusResponse::success("No links found."),
        Err(e) => {
            error!("Collect failed: {}", e);
            StatusResponse::error(e.to_string())
        }
    }
}

/// Scan one batch of the pending queue.
async fn process() -> StatusResponse {
    match run_process_task().await {
        Ok(summary) => match (&summary.outcome, summary.write) {
            (BatchOutcome::Exhausted, _) => StatusResponse::success("No links left."),
            (BatchOutcome::Processed(report), Some(WriteOutcome::Conflict)) => {
                StatusResponse::error(format!(
                    "Processed {} links, but the queue changed concurrently and was not updated.",
                    report.scanned
                ))
            }
            (BatchOutcome::Processed(report), _) => {
                StatusResponse::success(format!("Processed {} links.", report.scanned))
            }
        },
        Err(e) => {
            error!("Process failed: {}", e);
            StatusResponse::error(e.to_string())
        }
    }
}

/// Synchronous search over HTTP.
async fn search(payload: Value) -> ApiResponse {
    ApiResponse::from_search(run_search_task(payload).await)
}

async fn run_collect_task() -> Result<CollectSummary> {
    let config = config::load_from_env()?;
    let client = create_async_client(&config.crawler)?;
    let store = queue_store(&config).await?;
    run_collect(&config, &client, &store).await
}

async fn run_process_task() -> Result<ProcessSummary> {
    let config = config::load_from_env()?;
    let client = create_async_client(&config.crawler)?;
    let store = queue_store(&config).await?;
    run_process(&config, &client, &store).await
}

async fn run_search_task(payload: Value) -> Result<Vec<MatchResult>> {
    let request = parse_api_request(payload)?;
    let search = parse_search_request(request.body.as_deref())?;
    let config = config::load_from_env()?;
    let client = create_async_client(&config.crawler)?;
    run_search(
        &config,
        &client,
        search.search_url.as_deref().unwrap_or_default(),
        &search.keywords,
        config.batch.max_links,
    )
    .await
}

/// Parse the invocation event; an absent event is an empty request.
pub fn parse_api_request(payload: Value) -> Result<ApiRequest> {
    if payload.is_null() {
        return Ok(ApiRequest::default());
    }
    serde_json::from_value(payload)
        .map_err(|e| AppError::invalid_input(format!("Request event is malformed: {e}")))
}

/// Parse the JSON body of a search request; a missing body is an empty request.
pub fn parse_search_request(body: Option<&str>) -> Result<SearchRequest> {
    match body.map(str::trim).filter(|b| !b.is_empty()) {
        Some(body) => serde_json::from_str(body)
            .map_err(|e| AppError::invalid_input(format!("Request body is not valid JSON: {e}"))),
        None => Ok(SearchRequest::default()),
    }
}

async fn queue_store(config: &Config) -> Result<QueueStore> {
    let storage = S3Storage::from_env().await?;
    Ok(QueueStore::new(Arc::new(storage), config.store.queue_key.clone()))
}
