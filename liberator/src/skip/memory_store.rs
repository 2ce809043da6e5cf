//! In-memory skip record store.

use super::{SkipRecord, SkipRecordStore};
use crate::core::ProductId;
use crate::errors::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Skip records kept in memory, for tests and throwaway runs.
#[derive(Debug, Default)]
pub struct InMemorySkipRecordStore {
    records: Mutex<BTreeMap<ProductId, SkipRecord>>,
}

impl InMemorySkipRecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl SkipRecordStore for InMemorySkipRecordStore {
    async fn create(&self, record: &SkipRecord) -> Result<String> {
        self.records
            .lock()
            .insert(record.product_id.clone(), record.clone());
        Ok(format!("memory://skip/{}", record.product_id))
    }

    async fn exists(&self, product_id: &ProductId) -> Result<bool> {
        Ok(self.records.lock().contains_key(product_id))
    }

    async fn get(&self, product_id: &ProductId) -> Result<Option<SkipRecord>> {
        Ok(self.records.lock().get(product_id).cloned())
    }

    async fn clear(&self, product_id: &ProductId) -> Result<bool> {
        Ok(self.records.lock().remove(product_id).is_some())
    }

    async fn list(&self) -> Result<Vec<SkipRecord>> {
        Ok(self.records.lock().values().cloned().collect())
    }
}
