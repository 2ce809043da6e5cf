//! Skip records: the durable trail of permanently skipped items.
//!
//! A record exists for exactly as long as an item should not be attempted
//! again. Clearing it (by hand, or through [`SkipRecordStore::clear`]) makes
//! the item eligible for the next run.

mod details;
mod file_store;
mod memory_store;

pub use details::{render_details, truncate_field, DetailFormat, DETAILS_PLACEHOLDER};
pub use file_store::FileSkipRecordStore;
pub use memory_store::InMemorySkipRecordStore;

use crate::core::{LibraryItem, ProductId, StatusOutcome};
use crate::errors::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker written when an operator chooses to never retry an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipRecord {
    /// The skipped item.
    pub product_id: ProductId,
    /// Its title.
    pub title: String,
    /// Rendered item details (title, id, truncated author and narrator).
    pub details: String,
    /// Failure messages joined by line breaks.
    pub message: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl SkipRecord {
    /// Builds the record for a failed item with already rendered details.
    #[must_use]
    pub fn for_failure(item: &LibraryItem, outcome: &StatusOutcome, details: impl Into<String>) -> Self {
        Self {
            product_id: item.product_id.clone(),
            title: item.title.clone(),
            details: details.into(),
            message: outcome.aggregated_message(),
            created_at: Utc::now(),
        }
    }
}

/// Storage backend for skip records.
///
/// Records are keyed by product id; creating a record for an item that
/// already has one replaces it.
#[async_trait]
pub trait SkipRecordStore: Send + Sync {
    /// Writes a record and returns a human-readable location for it.
    async fn create(&self, record: &SkipRecord) -> Result<String>;

    /// Returns true if a record exists for the item.
    async fn exists(&self, product_id: &ProductId) -> Result<bool>;

    /// Reads the record for an item.
    async fn get(&self, product_id: &ProductId) -> Result<Option<SkipRecord>>;

    /// Removes the record for an item. Returns true if one existed.
    async fn clear(&self, product_id: &ProductId) -> Result<bool>;

    /// Lists every record.
    async fn list(&self) -> Result<Vec<SkipRecord>>;
}
