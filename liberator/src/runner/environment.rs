//! The collaborators a runner works with.

use crate::cancellation::CancellationToken;
use crate::decision::DecisionSurface;
use crate::events::EventBus;
use crate::queue::QueueSource;
use crate::skip::{DetailFormat, SkipRecordStore};
use std::sync::Arc;

/// Everything a runner needs besides its stage.
///
/// Cheap to clone; all collaborators are shared.
#[derive(Clone)]
pub struct RunEnvironment {
    /// Item supply and status updates.
    pub queue: Arc<dyn QueueSource>,
    /// Where permanent skips are recorded.
    pub skip_records: Arc<dyn SkipRecordStore>,
    /// Where failures are decided.
    pub decisions: Arc<dyn DecisionSurface>,
    /// Observers and the run log.
    pub events: Arc<EventBus>,
    /// Fired when the owner of the run goes away.
    pub cancellation: Arc<CancellationToken>,
    /// Shortening of item details in prompts and skip records.
    pub detail_format: DetailFormat,
}

impl RunEnvironment {
    /// Creates an environment with a fresh event bus and cancellation token.
    #[must_use]
    pub fn new(
        queue: Arc<dyn QueueSource>,
        skip_records: Arc<dyn SkipRecordStore>,
        decisions: Arc<dyn DecisionSurface>,
    ) -> Self {
        Self {
            queue,
            skip_records,
            decisions,
            events: Arc::new(EventBus::new()),
            cancellation: Arc::new(CancellationToken::new()),
            detail_format: DetailFormat::default(),
        }
    }

    /// Uses an existing event bus.
    #[must_use]
    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    /// Uses an existing cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: Arc<CancellationToken>) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Sets the detail format.
    #[must_use]
    pub fn with_detail_format(mut self, format: DetailFormat) -> Self {
        self.detail_format = format;
        self
    }

    /// Returns true once the run should stop between items.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.cancellation.is_cancelled() || self.decisions.is_disposed()
    }
}

impl std::fmt::Debug for RunEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunEnvironment")
            .field("events", &self.events)
            .field("cancellation", &self.cancellation)
            .field("detail_format", &self.detail_format)
            .finish_non_exhaustive()
    }
}
