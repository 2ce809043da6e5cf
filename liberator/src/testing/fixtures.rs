//! A wired-up run environment over an in-memory library.

use std::sync::Arc;

use crate::core::{LiberatedStatus, LibraryItem, ProductId, StageKind};
use crate::events::{CollectingEventSink, EventBus};
use crate::queue::LibraryQueue;
use crate::runner::RunEnvironment;
use crate::skip::InMemorySkipRecordStore;

use super::ScriptedDecisionSurface;

/// Three books in library order: A, B, C.
#[must_use]
pub fn sample_library() -> Vec<LibraryItem> {
    vec![
        LibraryItem::new("A", "Alpha")
            .with_authors("Ann Author")
            .with_narrators("Ned Narrator"),
        LibraryItem::new("B", "Beta")
            .with_authors("Bea Writer, Second Writer, Third Writer, Fourth Writer")
            .with_narrators("Nora Voice")
            .with_document(),
        LibraryItem::new("C", "Gamma").with_authors("Cy Scribe"),
    ]
}

/// In-memory library, skip records, scripted operator and collected events.
#[derive(Debug)]
pub struct Harness {
    /// The library.
    pub queue: Arc<LibraryQueue>,
    /// Skip records written during runs.
    pub skip_records: Arc<InMemorySkipRecordStore>,
    /// Scripted operator.
    pub decisions: Arc<ScriptedDecisionSurface>,
    /// Every event emitted.
    pub sink: Arc<CollectingEventSink>,
    events: Arc<EventBus>,
}

impl Harness {
    /// Creates a harness over `items`.
    ///
    /// # Panics
    ///
    /// Panics on duplicate product ids.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new(items: impl IntoIterator<Item = LibraryItem>) -> Self {
        let skip_records = Arc::new(InMemorySkipRecordStore::new());
        let queue = Arc::new(
            LibraryQueue::from_items(items, skip_records.clone()).expect("unique product ids"),
        );
        let sink = Arc::new(CollectingEventSink::new());
        let events = Arc::new(EventBus::new());
        events.subscribe(sink.clone());

        Self {
            queue,
            skip_records,
            decisions: Arc::new(ScriptedDecisionSurface::new()),
            sink,
            events,
        }
    }

    /// Creates a harness over an empty library.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Returns a run environment over the harness collaborators.
    #[must_use]
    pub fn env(&self) -> RunEnvironment {
        RunEnvironment::new(
            self.queue.clone(),
            self.skip_records.clone(),
            self.decisions.clone(),
        )
        .with_events(self.events.clone())
    }

    /// Returns the persisted book-level status of an item.
    ///
    /// # Panics
    ///
    /// Panics if the item is not in the library.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn status(&self, product_id: &str) -> LiberatedStatus {
        self.queue
            .status_of(&ProductId::from(product_id))
            .expect("item in library")
    }

    /// Returns the persisted status of one stage kind on an item.
    ///
    /// # Panics
    ///
    /// Panics if the item is not in the library.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn stage_status(&self, product_id: &str, kind: StageKind) -> LiberatedStatus {
        self.queue
            .stage_status_of(&ProductId::from(product_id), kind)
            .expect("item in library")
    }

    /// Returns the number of skip records.
    #[must_use]
    pub fn skip_count(&self) -> usize {
        self.skip_records.len()
    }
}
