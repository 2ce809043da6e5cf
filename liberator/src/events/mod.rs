//! Observer registration for pipeline events.
//!
//! The [`EventBus`] is the logging port injected into every runner. It fans
//! each [`PipelineEvent`] out to the registered sinks. A bus with no sinks
//! is valid and simply drops events.

mod sink;

pub use sink::{CollectingEventSink, EventSink, FnEventSink, LoggingEventSink, NoOpEventSink};

use crate::core::PipelineEvent;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::warn;

/// Fan-out of pipeline events to registered sinks.
#[derive(Default)]
pub struct EventBus {
    sinks: RwLock<Vec<Arc<dyn EventSink>>>,
}

impl EventBus {
    /// Creates a bus with no sinks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bus that forwards everything to `tracing`.
    #[must_use]
    pub fn with_logging() -> Self {
        let bus = Self::new();
        bus.subscribe(Arc::new(LoggingEventSink::default()));
        bus
    }

    /// Registers a sink.
    pub fn subscribe(&self, sink: Arc<dyn EventSink>) {
        self.sinks.write().push(sink);
    }

    /// Registers a closure as a sink.
    pub fn subscribe_fn<F>(&self, func: F)
    where
        F: Fn(&PipelineEvent) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(FnEventSink::new(func)));
    }

    /// Returns the number of registered sinks.
    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.sinks.read().len()
    }

    /// Delivers an event to every sink.
    ///
    /// A panicking sink is logged and skipped; the remaining sinks still
    /// receive the event.
    pub fn emit(&self, event: &PipelineEvent) {
        let sinks = self.sinks.read().clone();
        for sink in sinks {
            if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                sink.try_emit(event);
            })) {
                warn!(event_type = event.event_type(), "Event sink panicked: {:?}", e);
            }
        }
    }

    /// Emits an informational log line.
    pub fn info(&self, message: impl Into<String>) {
        self.emit(&PipelineEvent::info(message));
    }

    /// Emits an error log line.
    pub fn error(&self, message: impl Into<String>) {
        self.emit(&PipelineEvent::error(message));
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("sink_count", &self.sink_count())
            .finish()
    }
}
