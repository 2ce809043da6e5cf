//! Runners: drive a stage over one item or over the whole queue.
//!
//! Items are processed strictly one at a time. A failed item is always
//! resolved (abort, skip once, skip permanently) before the next item is
//! touched, and every status write is durable before the runner advances.

mod environment;
mod loop_runner;
mod policy;
mod processor;
mod single;
mod summary;


pub use environment::RunEnvironment;
pub use loop_runner::LoopRunner;
pub use policy::{ContinuationAction, RunnerVariant};
pub use single::SingleRunner;
pub use summary::{RunSummary, Termination};

/// Logged when a failed item is resolved.
pub const PROCESSING_FAILED_MESSAGE: &str =
    "ERROR. All books have not been processed. Most recent book: processing failed";

/// Logged when the queue is exhausted.
pub const ALL_PROCESSED_MESSAGE: &str = "Done. All books have been processed";

/// Logged when the operator cleared the keep-going flag.
pub const KEEP_GOING_UNCHECKED_MESSAGE: &str = "'Keep going' is unchecked";

/// Logged at the end of every run.
pub const DONE_MESSAGE: &str = "DONE";
