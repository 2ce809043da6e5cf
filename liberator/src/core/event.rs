//! Notifications delivered to pipeline observers.

use super::{LibraryItem, StatusOutcome};
use crate::runner::RunSummary;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a log notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Progress information.
    Info,
    /// A failure worth an operator's attention.
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// An event emitted while a run is in progress.
///
/// Events are fire-and-forget: nothing in the pipeline depends on whether
/// anyone is listening.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// A stage is about to process an item.
    Begin {
        /// Stage name.
        stage: String,
        /// The item.
        item: LibraryItem,
    },
    /// A stage finished processing an item.
    Completed {
        /// Stage name.
        stage: String,
        /// The item.
        item: LibraryItem,
        /// What the stage reported.
        outcome: StatusOutcome,
    },
    /// A log line for the operator.
    Log {
        /// Severity.
        level: LogLevel,
        /// Text.
        message: String,
    },
    /// The run is over.
    Done(RunSummary),
}

impl PipelineEvent {
    /// Creates an informational log event.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::Log {
            level: LogLevel::Info,
            message: message.into(),
        }
    }

    /// Creates an error log event.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Log {
            level: LogLevel::Error,
            message: message.into(),
        }
    }

    /// Returns a dotted event type name (e.g. "stage.begin").
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Begin { .. } => "stage.begin",
            Self::Completed { .. } => "stage.completed",
            Self::Log { .. } => "run.log",
            Self::Done(_) => "run.done",
        }
    }
}
