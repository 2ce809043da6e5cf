//! Stage trait and implementations.
//!
//! A stage is one processing capability (decrypt audio, fetch the companion
//! document, transcode) applied to one library item at a time. Stages never
//! let a fault escape: every failure comes back as
//! [`StatusOutcome::Failure`], and [`invoke`] additionally turns a panic into
//! a failure.

mod adapters;
mod composite;
mod context;
mod invoke;

pub use adapters::{AsyncFnStage, FnStage, ItemValidator};
pub use composite::CompositeStage;
pub use context::StageContext;
pub use invoke::invoke;
pub(crate) use invoke::panic_message;

use crate::core::{LibraryItem, StageKind, StatusOutcome};
use async_trait::async_trait;
use std::fmt::Debug;

/// Trait for pipeline stages.
///
/// Stages are stateless with respect to the pipeline; any state they need
/// (HTTP clients, keys) is set up when the stage is constructed for a run.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// Returns the name of the stage.
    fn name(&self) -> &str;

    /// Returns the kind of transformation this stage performs.
    fn kind(&self) -> StageKind {
        StageKind::Custom
    }

    /// Returns true if the item needs this stage.
    ///
    /// Items that do not validate are never handed to [`process`](Self::process)
    /// by the runners.
    fn validate(&self, item: &LibraryItem) -> bool {
        let _ = item;
        true
    }

    /// Returns the stage kinds a success on `item` has liberated.
    ///
    /// The runners mark each of them liberated on the item.
    fn completed_kinds(&self, item: &LibraryItem) -> Vec<StageKind> {
        let _ = item;
        vec![self.kind()]
    }

    /// Processes exactly one item.
    ///
    /// On failure the stage must not leave output that is indistinguishable
    /// from a successful run.
    async fn process(&self, item: &LibraryItem, ctx: &StageContext) -> StatusOutcome;
}
