//! Liberation status and stage kind enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of transformation a stage performs.
///
/// Each kind has its own liberation status on an item. Audio decryption and
/// the composite backup share the book-level status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Download the audio asset and remove its DRM.
    DecryptAudio,
    /// Download the companion document (PDF).
    FetchDocument,
    /// Convert a liberated audio file to another format.
    Transcode,
    /// Download an arbitrary file.
    DownloadFile,
    /// An all-or-nothing bundle of other stages.
    Composite,
    /// Anything else.
    #[default]
    Custom,
}

impl StageKind {
    /// Returns true if this kind reads and writes the book-level status.
    #[must_use]
    pub fn is_book_level(self) -> bool {
        matches!(self, Self::DecryptAudio | Self::Composite)
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DecryptAudio => write!(f, "decrypt_audio"),
            Self::FetchDocument => write!(f, "fetch_document"),
            Self::Transcode => write!(f, "transcode"),
            Self::DownloadFile => write!(f, "download_file"),
            Self::Composite => write!(f, "composite"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

/// Persisted liberation status of a library item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiberatedStatus {
    /// Never attempted.
    #[default]
    NotLiberated,
    /// A previous attempt left partial output behind.
    InProgress,
    /// All assets were produced.
    Liberated,
    /// An operator chose to never try this item again.
    PermanentlySkipped,
    /// The last attempt failed; the item may be retried.
    Error,
}

impl fmt::Display for LiberatedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotLiberated => write!(f, "not_liberated"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Liberated => write!(f, "liberated"),
            Self::PermanentlySkipped => write!(f, "permanently_skipped"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl LiberatedStatus {
    /// Returns true if the item has been fully liberated.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Liberated)
    }

    /// Returns true if nothing more should happen to the item.
    ///
    /// A permanently skipped item is still only terminal while its skip
    /// record exists; see [`crate::queue::LibraryQueue`].
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Liberated | Self::PermanentlySkipped)
    }
}
