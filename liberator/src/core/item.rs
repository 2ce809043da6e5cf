//! Library items as seen by the pipeline.

use super::{LiberatedStatus, StageKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable product identifier of a purchased asset (e.g. an ASIN).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a product identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One purchased asset in the library.
///
/// Items are owned by the library store. The pipeline only reads them and
/// updates their status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryItem {
    /// Unique, immutable product identifier.
    pub product_id: ProductId,
    /// Title.
    pub title: String,
    /// Comma separated author names.
    #[serde(default)]
    pub author_names: String,
    /// Comma separated narrator names.
    #[serde(default)]
    pub narrator_names: String,
    /// Whether the purchase ships with a companion document.
    #[serde(default)]
    pub has_document: bool,
    /// Book-level liberation status (the audio) at the time the item was read.
    #[serde(default)]
    pub status: LiberatedStatus,
    /// Status of the other stage kinds, e.g. the document or a conversion.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stage_status: BTreeMap<StageKind, LiberatedStatus>,
}

impl LibraryItem {
    /// Creates a not-yet-liberated item.
    #[must_use]
    pub fn new(product_id: impl Into<ProductId>, title: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            title: title.into(),
            author_names: String::new(),
            narrator_names: String::new(),
            has_document: false,
            status: LiberatedStatus::NotLiberated,
            stage_status: BTreeMap::new(),
        }
    }

    /// Sets the author names.
    #[must_use]
    pub fn with_authors(mut self, authors: impl Into<String>) -> Self {
        self.author_names = authors.into();
        self
    }

    /// Sets the narrator names.
    #[must_use]
    pub fn with_narrators(mut self, narrators: impl Into<String>) -> Self {
        self.narrator_names = narrators.into();
        self
    }

    /// Marks the item as shipping with a companion document.
    #[must_use]
    pub fn with_document(mut self) -> Self {
        self.has_document = true;
        self
    }

    /// Sets the book-level status.
    #[must_use]
    pub fn with_status(mut self, status: LiberatedStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the status of one stage kind.
    #[must_use]
    pub fn with_stage_status(mut self, kind: StageKind, status: LiberatedStatus) -> Self {
        self.set_status_for(kind, status);
        self
    }

    /// Returns the status of a stage kind.
    #[must_use]
    pub fn status_for(&self, kind: StageKind) -> LiberatedStatus {
        if kind.is_book_level() {
            self.status
        } else {
            self.stage_status.get(&kind).copied().unwrap_or_default()
        }
    }

    /// Records the status of a stage kind.
    pub fn set_status_for(&mut self, kind: StageKind, status: LiberatedStatus) {
        if kind.is_book_level() {
            self.status = status;
        } else {
            self.stage_status.insert(kind, status);
        }
    }
}
