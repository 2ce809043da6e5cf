//! The decision surface: where a run asks what to do about a failed item.
//!
//! An interactive front end answers through [`ChannelDecisionSurface`]; an
//! unattended deployment plugs in a [`FixedDecisionSurface`]. The runners do
//! not know the difference.

mod channel;
mod fixed;

pub use channel::{ChannelDecisionSurface, PendingDecision};
pub use fixed::FixedDecisionSurface;

use crate::core::{LibraryItem, StatusOutcome};
use crate::errors::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caption shown with every decision prompt.
pub const DECISION_CAPTION: &str = "Skip importing this book?";

/// The set of answers a prompt offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choices {
    /// Yes: skip permanently. No: skip this time only.
    YesNo,
    /// Abort the run, retry later, or ignore permanently.
    AbortRetryIgnore,
}

impl Choices {
    /// Returns the answers in display order.
    #[must_use]
    pub fn options(&self) -> &'static [OperatorChoice] {
        match self {
            Self::YesNo => &[OperatorChoice::Yes, OperatorChoice::No],
            Self::AbortRetryIgnore => &[
                OperatorChoice::Abort,
                OperatorChoice::Retry,
                OperatorChoice::Ignore,
            ],
        }
    }

    /// Returns true if `choice` is one of the offered answers.
    #[must_use]
    pub fn offers(&self, choice: OperatorChoice) -> bool {
        self.options().contains(&choice)
    }
}

/// An operator's answer to a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorChoice {
    /// Yes.
    Yes,
    /// No.
    No,
    /// Abort.
    Abort,
    /// Retry.
    Retry,
    /// Ignore.
    Ignore,
}

impl fmt::Display for OperatorChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes => write!(f, "yes"),
            Self::No => write!(f, "no"),
            Self::Abort => write!(f, "abort"),
            Self::Retry => write!(f, "retry"),
            Self::Ignore => write!(f, "ignore"),
        }
    }
}

/// A question put to the operator about one failed item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// The failed item.
    pub item: LibraryItem,
    /// What the stage reported.
    pub failure: StatusOutcome,
    /// Offered answers.
    pub choices: Choices,
    /// Prompt caption.
    pub caption: String,
    /// Prompt body, including the item details.
    pub text: String,
}

/// Where a run asks for decisions and learns whether to keep going.
#[async_trait]
pub trait DecisionSurface: Send + Sync {
    /// Asks what to do about a failed item.
    ///
    /// The run does not advance until this returns. An error ends the run.
    async fn decide(&self, request: &DecisionRequest) -> Result<OperatorChoice>;

    /// Returns false once the operator has asked the loop to stop after the
    /// current item.
    fn keep_going(&self) -> bool {
        true
    }

    /// Returns true once the owner of the run has gone away.
    fn is_disposed(&self) -> bool {
        false
    }
}
