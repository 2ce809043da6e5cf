//! Event sink trait and implementations.

use crate::core::{LogLevel, PipelineEvent};
use parking_lot::RwLock;
use tracing::{debug, error, info, Level};

/// Prefix for informational run logs written to `tracing`.
const AUTOMATED_BACKUP_PREFIX: &str = "Automated backup: ";

/// Trait for sinks that receive pipeline events.
///
/// Implementations must not block; an event sink is an observer and has no
/// say in how the run proceeds.
pub trait EventSink: Send + Sync {
    /// Receives one event.
    fn try_emit(&self, event: &PipelineEvent);
}

/// A no-op event sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

impl EventSink for NoOpEventSink {
    fn try_emit(&self, _event: &PipelineEvent) {}
}

/// An event sink backed by a closure.
pub struct FnEventSink<F>
where
    F: Fn(&PipelineEvent) + Send + Sync,
{
    func: F,
}

impl<F> FnEventSink<F>
where
    F: Fn(&PipelineEvent) + Send + Sync,
{
    /// Creates a closure sink.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> std::fmt::Debug for FnEventSink<F>
where
    F: Fn(&PipelineEvent) + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnEventSink").finish_non_exhaustive()
    }
}

impl<F> EventSink for FnEventSink<F>
where
    F: Fn(&PipelineEvent) + Send + Sync,
{
    fn try_emit(&self, event: &PipelineEvent) {
        (self.func)(event);
    }
}

/// An event sink that logs events using the tracing framework.
///
/// Error log events are always written at error level; everything else uses
/// the configured level.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a new logging event sink with the specified level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    fn log_at_level(&self, event_type: &str, message: &str) {
        if self.level == Level::DEBUG {
            debug!(event_type = %event_type, "{}", message);
        } else {
            info!(event_type = %event_type, "{}", message);
        }
    }
}

impl EventSink for LoggingEventSink {
    fn try_emit(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::Begin { stage, item } => {
                self.log_at_level(
                    event.event_type(),
                    &format!("Begin {stage}: [{}] {}", item.product_id, item.title),
                );
            }
            PipelineEvent::Completed {
                stage,
                item,
                outcome,
            } => {
                let result = if outcome.is_success() { "success" } else { "failure" };
                self.log_at_level(
                    event.event_type(),
                    &format!("Completed {stage}: [{}] {} ({result})", item.product_id, item.title),
                );
            }
            PipelineEvent::Log {
                level: LogLevel::Error,
                message,
            } => {
                error!(event_type = %event.event_type(), "{}", message);
            }
            PipelineEvent::Log {
                level: LogLevel::Info,
                message,
            } => {
                self.log_at_level(
                    event.event_type(),
                    &format!("{AUTOMATED_BACKUP_PREFIX}{message}"),
                );
            }
            PipelineEvent::Done(summary) => {
                info!(
                    event_type = %event.event_type(),
                    run_id = %summary.run_id,
                    visited = summary.visited,
                    succeeded = summary.succeeded,
                    skipped_once = summary.skipped_once,
                    skipped_permanently = summary.skipped_permanently,
                    termination = %summary.termination,
                    "Run finished"
                );
            }
        }
    }
}

/// A collecting event sink for testing and for UIs that poll.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: RwLock<Vec<PipelineEvent>>,
}

impl CollectingEventSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.read().clone()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }

    /// Returns events whose type starts with a prefix.
    #[must_use]
    pub fn events_of_type(&self, type_prefix: &str) -> Vec<PipelineEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.event_type().starts_with(type_prefix))
            .cloned()
            .collect()
    }

    /// Returns the text of every log event at a level.
    #[must_use]
    pub fn log_lines(&self, level: LogLevel) -> Vec<String> {
        self.events
            .read()
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::Log { level: l, message } if *l == level => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for CollectingEventSink {
    fn try_emit(&self, event: &PipelineEvent) {
        self.events.write().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LibraryItem, StatusOutcome};

    #[test]
    fn test_noop_sink() {
        NoOpEventSink.try_emit(&PipelineEvent::info("x"));
    }

    #[test]
    fn test_logging_sink_handles_every_event() {
        let sink = LoggingEventSink::default();
        let item = LibraryItem::new("B1", "Title");
        sink.try_emit(&PipelineEvent::Begin {
            stage: "decrypt".to_string(),
            item: item.clone(),
        });
        sink.try_emit(&PipelineEvent::Completed {
            stage: "decrypt".to_string(),
            item,
            outcome: StatusOutcome::fail("x"),
        });
        sink.try_emit(&PipelineEvent::info("hello"));
        sink.try_emit(&PipelineEvent::error("bad"));
        LoggingEventSink::debug().try_emit(&PipelineEvent::info("quiet"));
    }

    #[test]
    fn test_collecting_sink_filter() {
        let sink = CollectingEventSink::new();
        assert!(sink.is_empty());

        let item = LibraryItem::new("B1", "Title");
        sink.try_emit(&PipelineEvent::Begin {
            stage: "s".to_string(),
            item: item.clone(),
        });
        sink.try_emit(&PipelineEvent::Completed {
            stage: "s".to_string(),
            item,
            outcome: StatusOutcome::Success,
        });
        sink.try_emit(&PipelineEvent::info("note"));

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.events_of_type("stage.").len(), 2);
        assert_eq!(sink.log_lines(LogLevel::Info), vec!["note".to_string()]);
        assert!(sink.log_lines(LogLevel::Error).is_empty());

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_fn_sink() {
        let seen = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let sink = FnEventSink::new(move |e: &PipelineEvent| {
            seen_clone.lock().push(e.event_type());
        });

        sink.try_emit(&PipelineEvent::info("a"));
        assert_eq!(*seen.lock(), vec!["run.log"]);
    }
}
