// src/lib.rs

//! jobscan: finds job postings that mention given keywords.
//!
//! Two deployment shapes share the same stages:
//! - scheduled batch: `collect` fills a pending queue, `process` drains it
//!   a few links per invocation and logs matches
//! - synchronous: `search` discovers and scans inline and returns matches

pub mod config;
pub mod error;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
