//! Result of one stage invocation against one item.

use serde::{Deserialize, Serialize};

/// Separator used when failure messages are aggregated into one text.
pub(crate) const MESSAGE_SEPARATOR: &str = "\n";

/// The outcome of processing one item with one stage.
///
/// Created fresh per invocation and never persisted directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "messages", rename_all = "snake_case")]
pub enum StatusOutcome {
    /// The stage produced its asset.
    Success,
    /// The stage failed; messages are ordered, most important first.
    Failure(Vec<String>),
}

impl StatusOutcome {
    /// Creates a failure with a single message.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Failure(vec![message.into()])
    }

    /// Creates a failure from several messages.
    ///
    /// An empty list still yields a failure, with a generic message.
    #[must_use]
    pub fn fail_many<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let messages: Vec<String> = messages.into_iter().map(Into::into).collect();
        if messages.is_empty() {
            return Self::fail("processing failed");
        }
        Self::Failure(messages)
    }

    /// Converts an error into a failure carrying its message and full cause chain.
    #[must_use]
    pub fn from_error(error: &anyhow::Error) -> Self {
        let message = error.to_string();
        let detail = format!("{error:#}");
        if detail == message {
            Self::Failure(vec![message])
        } else {
            Self::Failure(vec![message, detail])
        }
    }

    /// Converts a stage result into an outcome.
    #[must_use]
    pub fn from_result(result: anyhow::Result<()>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(e) => Self::from_error(&e),
        }
    }

    /// Returns true on success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns true on failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Returns the failure messages (empty on success).
    #[must_use]
    pub fn messages(&self) -> &[String] {
        match self {
            Self::Success => &[],
            Self::Failure(messages) => messages,
        }
    }

    /// Joins the failure messages with line breaks.
    #[must_use]
    pub fn aggregated_message(&self) -> String {
        self.messages().join(MESSAGE_SEPARATOR)
    }
}

impl From<anyhow::Result<()>> for StatusOutcome {
    fn from(result: anyhow::Result<()>) -> Self {
        Self::from_result(result)
    }
}
