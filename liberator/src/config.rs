//! Runtime configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::decision::{DecisionSurface, FixedDecisionSurface, OperatorChoice};
use crate::errors::{LiberatorError, Result};
use crate::events::EventBus;
use crate::queue::LibraryQueue;
use crate::runner::RunEnvironment;
use crate::skip::{DetailFormat, FileSkipRecordStore, SkipRecordStore};

/// Top-level configuration for liberation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiberatorConfig {
    /// Directory holding skip-record marker files.
    #[serde(default = "default_skip_dir")]
    pub skip_dir: PathBuf,
    /// JSON file backing the library. In-memory when unset.
    #[serde(default)]
    pub library_path: Option<PathBuf>,
    /// Longest author or narrator text shown in full.
    #[serde(default = "default_detail_field_max_len")]
    pub detail_field_max_len: usize,
    /// Suffix for shortened text.
    #[serde(default = "default_ellipsis")]
    pub ellipsis: String,
    /// Answer given to every failure by unattended runs.
    #[serde(default = "default_unattended_choice")]
    pub unattended_choice: OperatorChoice,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_skip_dir() -> PathBuf {
    PathBuf::from("skip")
}

fn default_detail_field_max_len() -> usize {
    50
}

fn default_ellipsis() -> String {
    "...".to_string()
}

fn default_unattended_choice() -> OperatorChoice {
    OperatorChoice::Ignore
}

impl Default for LiberatorConfig {
    fn default() -> Self {
        Self {
            skip_dir: default_skip_dir(),
            library_path: None,
            detail_field_max_len: default_detail_field_max_len(),
            ellipsis: default_ellipsis(),
            unattended_choice: default_unattended_choice(),
            logging: LoggingConfig::default(),
        }
    }
}

impl LiberatorConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| LiberatorError::Config(format!("invalid configuration: {e}")))
    }

    /// Reads and parses a JSON file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            LiberatorError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    /// Sets the skip-record directory.
    #[must_use]
    pub fn with_skip_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.skip_dir = dir.into();
        self
    }

    /// Sets the library file.
    #[must_use]
    pub fn with_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_path = Some(path.into());
        self
    }

    /// Sets how detail fields are shortened.
    #[must_use]
    pub fn with_detail_format(mut self, max_len: usize, ellipsis: impl Into<String>) -> Self {
        self.detail_field_max_len = max_len;
        self.ellipsis = ellipsis.into();
        self
    }

    /// Sets the unattended answer.
    #[must_use]
    pub fn with_unattended_choice(mut self, choice: OperatorChoice) -> Self {
        self.unattended_choice = choice;
        self
    }

    /// Sets the log output.
    #[must_use]
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Returns the detail format.
    #[must_use]
    pub fn detail_format(&self) -> DetailFormat {
        DetailFormat {
            max_len: self.detail_field_max_len,
            ellipsis: self.ellipsis.clone(),
        }
    }

    /// Returns a decision surface that answers every failure with the
    /// unattended choice.
    #[must_use]
    pub fn unattended_surface(&self) -> FixedDecisionSurface {
        FixedDecisionSurface::new(self.unattended_choice)
    }

    /// Opens the skip store and the library, and wires them into an
    /// environment logging through `tracing`.
    pub async fn build_environment(
        &self,
        decisions: Arc<dyn DecisionSurface>,
    ) -> Result<RunEnvironment> {
        let skip_records: Arc<dyn SkipRecordStore> =
            Arc::new(FileSkipRecordStore::new(self.skip_dir.clone())?);
        let queue = match &self.library_path {
            Some(path) => LibraryQueue::open(path.clone(), skip_records.clone()).await?,
            None => LibraryQueue::from_items(Vec::new(), skip_records.clone())?,
        };

        Ok(RunEnvironment::new(Arc::new(queue), skip_records, decisions)
            .with_events(Arc::new(EventBus::with_logging()))
            .with_detail_format(self.detail_format()))
    }
}

/// Log output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber` filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}
