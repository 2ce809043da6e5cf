//! A decision surface that always gives the same answer.

use super::{DecisionRequest, DecisionSurface, OperatorChoice};
use crate::cancellation::CancellationToken;
use crate::errors::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Answers every prompt with one fixed choice.
///
/// Used for unattended runs. When the fixed choice is not offered by a
/// prompt, the continuation policy decides what it means.
#[derive(Debug)]
pub struct FixedDecisionSurface {
    choice: OperatorChoice,
    keep_going: AtomicBool,
    cancellation: Arc<CancellationToken>,
}

impl FixedDecisionSurface {
    /// Creates a surface answering `choice`.
    #[must_use]
    pub fn new(choice: OperatorChoice) -> Self {
        Self {
            choice,
            keep_going: AtomicBool::new(true),
            cancellation: Arc::new(CancellationToken::new()),
        }
    }

    /// Shares an existing cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: Arc<CancellationToken>) -> Self {
        self.cancellation = token;
        self
    }

    /// Sets the keep-going flag.
    pub fn set_keep_going(&self, keep_going: bool) {
        self.keep_going.store(keep_going, Ordering::SeqCst);
    }

    /// Returns the cancellation token.
    #[must_use]
    pub fn cancellation(&self) -> &Arc<CancellationToken> {
        &self.cancellation
    }
}

#[async_trait]
impl DecisionSurface for FixedDecisionSurface {
    async fn decide(&self, request: &DecisionRequest) -> Result<OperatorChoice> {
        info!(
            product_id = %request.item.product_id,
            choice = %self.choice,
            "Answering with fixed choice"
        );
        Ok(self.choice)
    }

    fn keep_going(&self) -> bool {
        self.keep_going.load(Ordering::SeqCst)
    }

    fn is_disposed(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
