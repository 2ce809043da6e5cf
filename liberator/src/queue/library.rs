//! The library store as a queue source.

use super::QueueSource;
use crate::core::{LiberatedStatus, LibraryItem, ProductId, StageKind};
use crate::errors::{LiberatorError, Result};
use crate::skip::SkipRecordStore;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use parking_lot::RwLock;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// An ordered library of items with optional JSON file persistence.
///
/// An item is eligible for a stage kind when that kind is not liberated on it
/// and the item has no skip record. A permanently skipped item whose record
/// has been cleared is eligible again.
pub struct LibraryQueue {
    items: RwLock<Vec<LibraryItem>>,
    skip_records: Arc<dyn SkipRecordStore>,
    path: Option<PathBuf>,
}

impl LibraryQueue {
    /// Creates an in-memory library.
    pub fn from_items(
        items: impl IntoIterator<Item = LibraryItem>,
        skip_records: Arc<dyn SkipRecordStore>,
    ) -> Result<Self> {
        let queue = Self {
            items: RwLock::new(Vec::new()),
            skip_records,
            path: None,
        };
        for item in items {
            queue.push(item)?;
        }
        Ok(queue)
    }

    /// Opens a library backed by a JSON file. A missing file is an empty library.
    pub async fn open(path: impl Into<PathBuf>, skip_records: Arc<dyn SkipRecordStore>) -> Result<Self> {
        let path = path.into();
        let items: Vec<LibraryItem> = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        info!(path = %path.display(), count = items.len(), "Library opened");

        let mut queue = Self::from_items(items, skip_records)?;
        queue.path = Some(path);
        Ok(queue)
    }

    /// Adds an item at the end of the library.
    pub async fn insert(&self, item: LibraryItem) -> Result<()> {
        self.push(item)?;
        self.persist().await
    }

    /// Returns a copy of an item.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<LibraryItem> {
        self.items
            .read()
            .iter()
            .find(|i| &i.product_id == product_id)
            .cloned()
    }

    /// Returns the current book-level status of an item.
    #[must_use]
    pub fn status_of(&self, product_id: &ProductId) -> Option<LiberatedStatus> {
        self.get(product_id).map(|i| i.status)
    }

    /// Returns the current status of one stage kind on an item.
    #[must_use]
    pub fn stage_status_of(&self, product_id: &ProductId, kind: StageKind) -> Option<LiberatedStatus> {
        self.get(product_id).map(|i| i.status_for(kind))
    }

    /// Returns a copy of every item in library order.
    #[must_use]
    pub fn items(&self) -> Vec<LibraryItem> {
        self.items.read().clone()
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns true if the library is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Returns the skip record store gating eligibility.
    #[must_use]
    pub fn skip_records(&self) -> &Arc<dyn SkipRecordStore> {
        &self.skip_records
    }

    /// Returns true if the item still needs work of the given kind.
    pub async fn is_eligible(&self, item: &LibraryItem, kind: StageKind) -> Result<bool> {
        if item.status_for(kind) == LiberatedStatus::Liberated {
            return Ok(false);
        }
        Ok(!self.skip_records.exists(&item.product_id).await?)
    }

    fn push(&self, item: LibraryItem) -> Result<()> {
        let mut items = self.items.write();
        if items.iter().any(|i| i.product_id == item.product_id) {
            return Err(LiberatorError::Store(format!(
                "duplicate product id: {}",
                item.product_id
            )));
        }
        items.push(item);
        Ok(())
    }

    async fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = {
            let items = self.items.read();
            serde_json::to_vec_pretty(&*items)?
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, path).await?;
        debug!(path = %path.display(), "Library saved");
        Ok(())
    }
}

impl std::fmt::Debug for LibraryQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryQueue")
            .field("len", &self.len())
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl QueueSource for LibraryQueue {
    fn eligible_items(&self, kind: StageKind) -> BoxStream<'_, Result<LibraryItem>> {
        stream::unfold(0_usize, move |mut index| async move {
            loop {
                let candidate = self.items.read().get(index).cloned();
                index += 1;

                let item = candidate?;
                match self.is_eligible(&item, kind).await {
                    Ok(true) => return Some((Ok(item), index)),
                    Ok(false) => {}
                    Err(e) => return Some((Err(e), index)),
                }
            }
        })
        .boxed()
    }

    async fn validate_single(&self, product_id: &ProductId) -> Result<LibraryItem> {
        self.get(product_id)
            .ok_or_else(|| LiberatorError::NotFound(product_id.clone()))
    }

    async fn update_status(
        &self,
        product_id: &ProductId,
        kind: StageKind,
        status: LiberatedStatus,
    ) -> Result<()> {
        {
            let mut items = self.items.write();
            let item = items
                .iter_mut()
                .find(|i| &i.product_id == product_id)
                .ok_or_else(|| LiberatorError::NotFound(product_id.clone()))?;
            item.set_status_for(kind, status);
        }
        debug!(product_id = %product_id, kind = %kind, status = %status, "Status updated");
        self.persist().await
    }
}
