//! A decision surface that forwards prompts to an interactive front end.

use super::{DecisionRequest, DecisionSurface, OperatorChoice};
use crate::cancellation::CancellationToken;
use crate::errors::{LiberatorError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// A prompt waiting for the operator's answer.
#[derive(Debug)]
pub struct PendingDecision {
    /// The question.
    pub request: DecisionRequest,
    reply: oneshot::Sender<OperatorChoice>,
}

impl PendingDecision {
    /// Answers the prompt. Returns false if the run stopped waiting.
    pub fn respond(self, choice: OperatorChoice) -> bool {
        self.reply.send(choice).is_ok()
    }
}

/// Sends each prompt over a channel and waits for the answer.
///
/// The front end owns the receiving half. Closing it, or dropping a
/// [`PendingDecision`] without answering, is a decision-surface error and
/// ends the run. Disposing the surface while a prompt is pending answers
/// it with [`OperatorChoice::Abort`].
#[derive(Debug)]
pub struct ChannelDecisionSurface {
    tx: mpsc::Sender<PendingDecision>,
    keep_going: AtomicBool,
    cancellation: Arc<CancellationToken>,
}

impl ChannelDecisionSurface {
    /// Creates a surface and the receiver the front end reads prompts from.
    #[must_use]
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<PendingDecision>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let surface = Self {
            tx,
            keep_going: AtomicBool::new(true),
            cancellation: Arc::new(CancellationToken::new()),
        };
        (surface, rx)
    }

    /// Sets the operator's keep-going flag.
    pub fn set_keep_going(&self, keep_going: bool) {
        self.keep_going.store(keep_going, Ordering::SeqCst);
    }

    /// Signals that the front end has gone away.
    pub fn dispose(&self) {
        self.cancellation.cancel("decision surface disposed");
    }

    /// Returns the cancellation token fired by [`dispose`](Self::dispose).
    #[must_use]
    pub fn cancellation(&self) -> &Arc<CancellationToken> {
        &self.cancellation
    }
}

#[async_trait]
impl DecisionSurface for ChannelDecisionSurface {
    async fn decide(&self, request: &DecisionRequest) -> Result<OperatorChoice> {
        let (reply, answer) = oneshot::channel();
        let pending = PendingDecision {
            request: request.clone(),
            reply,
        };

        self.tx
            .send(pending)
            .await
            .map_err(|_| LiberatorError::Decision("decision channel closed".to_string()))?;
        debug!(product_id = %request.item.product_id, "Waiting for operator decision");

        tokio::select! {
            choice = answer => choice.map_err(|_| {
                LiberatorError::Decision("prompt dropped without an answer".to_string())
            }),
            () = self.cancellation.cancelled() => {
                warn!(product_id = %request.item.product_id, "Disposed while a decision was pending");
                Ok(OperatorChoice::Abort)
            }
        }
    }

    fn keep_going(&self) -> bool {
        self.keep_going.load(Ordering::SeqCst)
    }

    fn is_disposed(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
