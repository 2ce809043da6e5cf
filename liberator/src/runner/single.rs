//! Runner for exactly one item.

use super::processor::{conclude, finish, ItemProcessor};
use super::{RunEnvironment, RunSummary, RunnerVariant, Termination};
use crate::core::{LibraryItem, ProductId};
use crate::errors::Result;
use crate::stages::{Stage, StageContext};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Runs a stage once, for one item.
///
/// A failure is put to the operator as a yes/no question: skip permanently,
/// or skip this time only. No further items follow either way.
#[derive(Debug, Clone)]
pub struct SingleRunner {
    env: RunEnvironment,
    stage: Arc<dyn Stage>,
}

impl SingleRunner {
    /// Creates a runner bound to a stage.
    #[must_use]
    pub fn new(env: RunEnvironment, stage: Arc<dyn Stage>) -> Self {
        Self { env, stage }
    }

    /// Returns the environment.
    #[must_use]
    pub fn environment(&self) -> &RunEnvironment {
        &self.env
    }

    /// Processes `item`. With no item the run completes immediately.
    pub async fn run(&self, item: Option<LibraryItem>) -> RunSummary {
        let run_id = Uuid::new_v4();
        info!(
            run_id = %run_id,
            product_id = ?item.as_ref().map(|i| i.product_id.as_str()),
            stage = %self.stage.name(),
            "Begin backup single"
        );

        let mut summary = RunSummary::start(run_id, RunnerVariant::Single, self.stage.name());
        let result = AssertUnwindSafe(self.run_item(run_id, item.as_ref(), &mut summary))
            .catch_unwind()
            .await;
        let termination = conclude(&self.env, result);
        finish(&self.env, summary, termination)
    }

    /// Looks the item up in the queue first. An unknown id is logged and
    /// handled like a missing item.
    pub async fn run_by_id(&self, product_id: &ProductId) -> RunSummary {
        match self.env.queue.validate_single(product_id).await {
            Ok(item) => self.run(Some(item)).await,
            Err(e) => {
                self.env.events.error(e.to_string());
                self.run(None).await
            }
        }
    }

    async fn run_item(
        &self,
        run_id: Uuid,
        item: Option<&LibraryItem>,
        summary: &mut RunSummary,
    ) -> Result<Termination> {
        let Some(item) = item else {
            return Ok(Termination::NoItem);
        };

        if !self.stage.validate(item) {
            self.env.events.info(format!(
                "Nothing to do for [{}] {}",
                item.product_id, item.title
            ));
            return Ok(Termination::Completed);
        }

        let ctx = StageContext::new(run_id, self.env.events.clone(), self.env.cancellation.clone());
        let processor = ItemProcessor::new(&self.env, self.stage.as_ref(), RunnerVariant::Single, ctx);
        processor.process(item).await?.record(summary);

        Ok(Termination::Completed)
    }
}
