//! Queue sources: where runners get their items from.

mod library;

pub use library::LibraryQueue;

use crate::core::{LiberatedStatus, LibraryItem, ProductId, StageKind};
use crate::errors::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Supplies items to the runners and receives their status updates.
#[async_trait]
pub trait QueueSource: Send + Sync {
    /// Streams the items that still need work of the given kind, in stable
    /// library order.
    ///
    /// Each item is read when the stream reaches it, so status changes made
    /// earlier in the same run are visible. The stream is consumed once per
    /// run.
    fn eligible_items(&self, kind: StageKind) -> BoxStream<'_, Result<LibraryItem>>;

    /// Looks up one item for the single-item runner.
    ///
    /// Returns [`LiberatorError::NotFound`](crate::errors::LiberatorError::NotFound)
    /// for unknown ids.
    async fn validate_single(&self, product_id: &ProductId) -> Result<LibraryItem>;

    /// Persists a new status for one stage kind. Must be durable when this
    /// returns.
    async fn update_status(
        &self,
        product_id: &ProductId,
        kind: StageKind,
        status: LiberatedStatus,
    ) -> Result<()>;
}
