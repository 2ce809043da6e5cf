//! What a run did.

use super::RunnerVariant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Why a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The single-item runner handled its item.
    Completed,
    /// The single-item runner had no item.
    NoItem,
    /// The queue ran dry.
    Exhausted,
    /// The operator aborted after a failure.
    Aborted,
    /// The operator cleared the keep-going flag.
    KeepGoingCleared,
    /// The owner of the run went away.
    Disposed,
    /// A fault outside the stages ended the run.
    Fatal(String),
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::NoItem => write!(f, "no_item"),
            Self::Exhausted => write!(f, "exhausted"),
            Self::Aborted => write!(f, "aborted"),
            Self::KeepGoingCleared => write!(f, "keep_going_cleared"),
            Self::Disposed => write!(f, "disposed"),
            Self::Fatal(message) => write!(f, "fatal: {message}"),
        }
    }
}

/// Counters and end state of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run ID.
    pub run_id: Uuid,
    /// Runner variant.
    pub variant: RunnerVariant,
    /// Name of the bound stage.
    pub stage: String,
    /// Items handed to the stage.
    pub visited: usize,
    /// Items that succeeded.
    pub succeeded: usize,
    /// Failed items left eligible.
    pub skipped_once: usize,
    /// Failed items given a skip record.
    pub skipped_permanently: usize,
    /// Why the run ended.
    pub termination: Termination,
    /// Start time.
    pub started_at: DateTime<Utc>,
    /// End time.
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub(crate) fn start(run_id: Uuid, variant: RunnerVariant, stage: &str) -> Self {
        let now = Utc::now();
        Self {
            run_id,
            variant,
            stage: stage.to_string(),
            visited: 0,
            succeeded: 0,
            skipped_once: 0,
            skipped_permanently: 0,
            termination: Termination::Completed,
            started_at: now,
            finished_at: now,
        }
    }

    pub(crate) fn finish(mut self, termination: Termination) -> Self {
        self.termination = termination;
        self.finished_at = Utc::now();
        self
    }

    /// Returns the number of failed items.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.visited - self.succeeded
    }

    /// Returns the run duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_termination_display() {
        assert_eq!(Termination::Exhausted.to_string(), "exhausted");
        assert_eq!(Termination::Fatal("db gone".into()).to_string(), "fatal: db gone");
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = RunSummary::start(Uuid::new_v4(), RunnerVariant::Loop, "backup_book");
        summary.visited = 3;
        summary.succeeded = 2;
        summary.skipped_once = 1;

        let summary = summary.finish(Termination::Exhausted);

        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.termination, Termination::Exhausted);
        assert!(summary.duration_ms() >= 0);
    }
}
