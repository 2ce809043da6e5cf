//! Canned automation entry points.
//!
//! Each entry point binds a stage to a runner: backing up one book, backing
//! up the whole library, converting it, or fetching every companion
//! document.

use std::sync::Arc;

use tracing::info;

use crate::core::{LibraryItem, PipelineEvent, ProductId, StatusOutcome};
use crate::runner::{LoopRunner, RunEnvironment, RunSummary, SingleRunner};
use crate::stages::{CompositeStage, Stage};

/// The concrete stages the controller composes.
#[derive(Debug, Clone)]
pub struct StageSet {
    /// Downloads and decrypts the audio.
    pub decrypt_audio: Arc<dyn Stage>,
    /// Downloads the companion document.
    pub fetch_document: Arc<dyn Stage>,
    /// Converts an already decrypted book.
    pub transcode: Arc<dyn Stage>,
}

impl StageSet {
    /// Returns the full backup stage: decrypt the audio, then fetch the document.
    #[must_use]
    pub fn backup_book(&self) -> Arc<dyn Stage> {
        Arc::new(CompositeStage::backup_book(
            self.decrypt_audio.clone(),
            self.fetch_document.clone(),
        ))
    }
}

/// Drives the canned runs against one environment.
#[derive(Debug, Clone)]
pub struct AutomationController {
    env: RunEnvironment,
    stages: StageSet,
}

impl AutomationController {
    /// Creates a controller.
    #[must_use]
    pub fn new(env: RunEnvironment, stages: StageSet) -> Self {
        Self { env, stages }
    }

    /// Calls `listener` whenever any stage finishes an item.
    #[must_use]
    pub fn with_completed_listener<F>(self, listener: F) -> Self
    where
        F: Fn(&LibraryItem, &StatusOutcome) + Send + Sync + 'static,
    {
        self.env.events.subscribe_fn(move |event| {
            if let PipelineEvent::Completed { item, outcome, .. } = event {
                listener(item, outcome);
            }
        });
        self
    }

    /// Returns the environment.
    #[must_use]
    pub fn environment(&self) -> &RunEnvironment {
        &self.env
    }

    /// Backs up one book.
    pub async fn backup_single(&self, item: Option<LibraryItem>) -> RunSummary {
        info!(product_id = ?item.as_ref().map(|i| i.product_id.as_str()), "Backup single requested");
        SingleRunner::new(self.env.clone(), self.stages.backup_book())
            .run(item)
            .await
    }

    /// Backs up one book, looked up by id.
    pub async fn backup_single_by_id(&self, product_id: &ProductId) -> RunSummary {
        SingleRunner::new(self.env.clone(), self.stages.backup_book())
            .run_by_id(product_id)
            .await
    }

    /// Backs up every eligible book.
    pub async fn backup_all(&self) -> RunSummary {
        info!("Backup all requested");
        self.run_loop(self.stages.backup_book()).await
    }

    /// Converts every eligible book.
    pub async fn convert_all(&self) -> RunSummary {
        info!("Convert all requested");
        self.run_loop(self.stages.transcode.clone()).await
    }

    /// Fetches the document of every eligible book that has one.
    pub async fn backup_all_documents(&self) -> RunSummary {
        info!("Backup all documents requested");
        self.run_loop(self.stages.fetch_document.clone()).await
    }

    async fn run_loop(&self, stage: Arc<dyn Stage>) -> RunSummary {
        LoopRunner::new(self.env.clone(), stage).run().await
    }
}
