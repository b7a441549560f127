//! Pipeline entry points for scanner operations.
//!
//! - `run_collect`: Discover job links and replace the pending queue
//! - `run_process`: Scan one batch of the pending queue
//! - `run_search`: Discover and scan inline, returning matches to the caller

pub mod collect;
pub mod process;
pub mod search;

pub use collect::{CollectSummary, run_collect};
pub use process::{ProcessSummary, run_process};
pub use search::run_search;
