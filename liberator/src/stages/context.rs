//! Per-run context handed to every stage invocation.

use crate::cancellation::CancellationToken;
use crate::events::EventBus;
use std::sync::Arc;
use uuid::Uuid;

/// Context shared by all stage invocations of one run.
#[derive(Debug, Clone)]
pub struct StageContext {
    run_id: Uuid,
    events: Arc<EventBus>,
    cancellation: Arc<CancellationToken>,
}

impl StageContext {
    /// Creates a context for a run.
    #[must_use]
    pub fn new(run_id: Uuid, events: Arc<EventBus>, cancellation: Arc<CancellationToken>) -> Self {
        Self {
            run_id,
            events,
            cancellation,
        }
    }

    /// Creates a context that belongs to no run and has no listeners.
    #[must_use]
    pub fn detached() -> Self {
        Self::new(
            Uuid::new_v4(),
            Arc::new(EventBus::new()),
            Arc::new(CancellationToken::new()),
        )
    }

    /// Returns the run ID.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Returns the event bus of the run.
    #[must_use]
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Returns the cancellation token of the run.
    #[must_use]
    pub fn cancellation(&self) -> &Arc<CancellationToken> {
        &self.cancellation
    }

    /// Returns true once the run's owner has gone away.
    ///
    /// Long stages may use this to stop early; they must then report a failure.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Writes an informational line to the run log.
    pub fn log(&self, message: impl Into<String>) {
        self.events.info(message);
    }
}
