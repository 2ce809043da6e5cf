//! Continuation policy: what a failed item means for the rest of the run.

use crate::decision::{Choices, OperatorChoice};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which runner is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerVariant {
    /// One item, no queue to continue with.
    Single,
    /// Unattended walk over the queue.
    Loop,
}

impl fmt::Display for RunnerVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Loop => write!(f, "loop"),
        }
    }
}

/// What happens after a failed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinuationAction {
    /// Stop the run; no further items are touched.
    Abort,
    /// Leave the item eligible and move on.
    SkipOnce,
    /// Write a skip record, mark the item skipped and move on.
    SkipPermanently,
}

impl RunnerVariant {
    /// Returns the answers offered to the operator.
    #[must_use]
    pub fn choices(self) -> Choices {
        match self {
            Self::Single => Choices::YesNo,
            Self::Loop => Choices::AbortRetryIgnore,
        }
    }

    /// Returns the prompt body for a failed item.
    #[must_use]
    pub fn prompt_text(self, details: &str) -> String {
        match self {
            Self::Single => format!(
                "An error occurred while trying to process this book. Skip this book permanently?\n\
                 {details}\n\n\
                 - Click YES to skip this book permanently.\n\n\
                 - Click NO to skip the book this time only. We'll try again later."
            ),
            Self::Loop => format!(
                "An error occurred while trying to process this book.\n\
                 {details}\n\n\
                 - ABORT: stop processing books.\n\n\
                 - RETRY: retry this book later. Just skip it for now. Continue processing books. \
                 (Will try this book again later.)\n\n\
                 - IGNORE: Permanently ignore this book. Continue processing books. \
                 (Will not try this book again later.)"
            ),
        }
    }

    /// Maps an operator's answer to an action.
    ///
    /// Total over every answer. YES and IGNORE both mean "never again" in
    /// either runner, so a fixed answer behaves the same whichever prompt it
    /// meets. Only the loop can abort; the single-item runner has nothing to
    /// continue with, so ABORT there is a skip for this time only.
    #[must_use]
    pub fn resolve(self, choice: OperatorChoice) -> ContinuationAction {
        match (self, choice) {
            (_, OperatorChoice::Yes | OperatorChoice::Ignore) => ContinuationAction::SkipPermanently,
            (Self::Loop, OperatorChoice::Abort) => ContinuationAction::Abort,
            _ => ContinuationAction::SkipOnce,
        }
    }
}
