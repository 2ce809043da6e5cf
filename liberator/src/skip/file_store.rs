//! Skip records as marker files on disk.

use super::{SkipRecord, SkipRecordStore};
use crate::core::ProductId;
use crate::errors::{LiberatorError, Result};
use async_trait::async_trait;
use regex::{Captures, Regex};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const SKIP_SUFFIX: &str = ".skip.json";

/// Stores one JSON marker file per skipped item in a directory.
///
/// Files are named `<product id>.skip.json`, with every byte outside
/// `[A-Za-z0-9._-]` percent-encoded so distinct ids never share a file.
/// Deleting a file by hand has the same effect as [`SkipRecordStore::clear`].
#[derive(Debug, Clone)]
pub struct FileSkipRecordStore {
    dir: PathBuf,
    unsafe_chars: Regex,
}

impl FileSkipRecordStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let unsafe_chars = Regex::new(r"[^A-Za-z0-9._-]")
            .map_err(|e| LiberatorError::Internal(format!("invalid file name pattern: {e}")))?;
        Ok(Self {
            dir: dir.into(),
            unsafe_chars,
        })
    }

    /// Returns the directory holding the marker files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the marker file path for an item.
    #[must_use]
    pub fn path_for(&self, product_id: &ProductId) -> PathBuf {
        let stem = self
            .unsafe_chars
            .replace_all(product_id.as_str(), |caps: &Captures<'_>| {
                caps[0].bytes().map(|b| format!("%{b:02X}")).collect::<String>()
            });
        self.dir.join(format!("{stem}{SKIP_SUFFIX}"))
    }

    async fn read_record(path: &Path) -> Result<Option<SkipRecord>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl SkipRecordStore for FileSkipRecordStore {
    async fn create(&self, record: &SkipRecord) -> Result<String> {
        let path = self.path_for(&record.product_id);
        let json = serde_json::to_vec_pretty(record)?;

        let write = async {
            tokio::fs::create_dir_all(&self.dir).await?;
            let tmp = path.with_extension("tmp");
            tokio::fs::write(&tmp, &json).await?;
            tokio::fs::rename(&tmp, &path).await
        };
        write
            .await
            .map_err(|e| LiberatorError::skip_record(&record.product_id, e.to_string()))?;

        debug!(product_id = %record.product_id, path = %path.display(), "Skip record written");
        Ok(path.display().to_string())
    }

    async fn exists(&self, product_id: &ProductId) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.path_for(product_id)).await?)
    }

    async fn get(&self, product_id: &ProductId) -> Result<Option<SkipRecord>> {
        Self::read_record(&self.path_for(product_id)).await
    }

    async fn clear(&self, product_id: &ProductId) -> Result<bool> {
        match tokio::fs::remove_file(self.path_for(product_id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(LiberatorError::skip_record(product_id, e.to_string())),
        }
    }

    async fn list(&self) -> Result<Vec<SkipRecord>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_marker = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(SKIP_SUFFIX));
            if !is_marker {
                continue;
            }

            match Self::read_record(&path).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => warn!(path = %path.display(), "Ignoring unreadable skip record: {}", e),
            }
        }

        records.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        Ok(records)
    }
}
