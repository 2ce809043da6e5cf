//! Runner over every eligible item in the queue.

use super::processor::{conclude, finish, ItemProcessor, Resolution};
use super::{RunEnvironment, RunSummary, RunnerVariant, Termination};
use super::{ALL_PROCESSED_MESSAGE, KEEP_GOING_UNCHECKED_MESSAGE};
use crate::errors::Result;
use crate::stages::{Stage, StageContext};
use futures::{FutureExt, StreamExt};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Runs a stage over the queue until it is exhausted or the run is stopped.
///
/// A failure is put to the operator as abort/retry/ignore: abort ends the
/// run, retry skips the item this time only, ignore skips it permanently.
/// After each item the runner stops if the surface was disposed or the
/// keep-going flag was cleared.
#[derive(Debug, Clone)]
pub struct LoopRunner {
    env: RunEnvironment,
    stage: Arc<dyn Stage>,
}

impl LoopRunner {
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

    /// Processes every eligible item in queue order.
    pub async fn run(&self) -> RunSummary {
        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, stage = %self.stage.name(), "Begin backup loop");

        let mut summary = RunSummary::start(run_id, RunnerVariant::Loop, self.stage.name());
        let result = AssertUnwindSafe(self.run_queue(run_id, &mut summary))
            .catch_unwind()
            .await;
        let termination = conclude(&self.env, result);
        finish(&self.env, summary, termination)
    }

    async fn run_queue(&self, run_id: Uuid, summary: &mut RunSummary) -> Result<Termination> {
        let ctx = StageContext::new(run_id, self.env.events.clone(), self.env.cancellation.clone());
        let processor = ItemProcessor::new(&self.env, self.stage.as_ref(), RunnerVariant::Loop, ctx);

        let mut items = self.env.queue.eligible_items(self.stage.kind());
        while let Some(item) = items.next().await {
            let item = item?;
            if !self.stage.validate(&item) {
                debug!(product_id = %item.product_id, stage = %self.stage.name(), "Stage does not apply");
                continue;
            }

            let resolution = processor.process(&item).await?;
            resolution.record(summary);
            if resolution == Resolution::Aborted {
                return Ok(Termination::Aborted);
            }

            if self.env.is_disposed() {
                return Ok(Termination::Disposed);
            }
            if !self.env.decisions.keep_going() {
                self.env.events.info(KEEP_GOING_UNCHECKED_MESSAGE);
                return Ok(Termination::KeepGoingCleared);
            }
        }

        self.env.events.info(ALL_PROCESSED_MESSAGE);
        Ok(Termination::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LiberatedStatus, LibraryItem, LogLevel};
    use crate::decision::{Choices, OperatorChoice};
    use crate::testing::{sample_library, Harness, ScriptedStage};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_empty_queue_is_exhausted() {
        let harness = Harness::empty();
        let stage = Arc::new(ScriptedStage::new("backup"));
        let summary = LoopRunner::new(harness.env(), stage.clone()).run().await;

        assert_eq!(summary.termination, Termination::Exhausted);
        assert_eq!(summary.visited, 0);
        assert!(harness
            .sink
            .log_lines(LogLevel::Info)
            .contains(&ALL_PROCESSED_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn test_all_successes() {
        let harness = Harness::new(sample_library());
        let stage = Arc::new(ScriptedStage::new("backup"));
        let summary = LoopRunner::new(harness.env(), stage.clone()).run().await;

        assert_eq!(summary.succeeded, 3);
        assert_eq!(stage.invoked_ids(), vec!["A", "B", "C"]);
        assert_eq!(harness.status("C"), LiberatedStatus::Liberated);
        assert!(harness.decisions.requests().is_empty());
    }

    #[tokio::test]
    async fn test_liberated_items_are_not_revisited() {
        let harness = Harness::new([
            LibraryItem::new("A", "Alpha").with_status(LiberatedStatus::Liberated),
            LibraryItem::new("B", "Beta"),
        ]);
        let stage = Arc::new(ScriptedStage::new("backup"));
        let summary = LoopRunner::new(harness.env(), stage.clone()).run().await;

        assert_eq!(summary.visited, 1);
        assert_eq!(stage.invoked_ids(), vec!["B"]);
    }

    #[tokio::test]
    async fn test_failure_prompts_with_abort_retry_ignore() {
        let harness = Harness::new(sample_library());
        harness.decisions.push(OperatorChoice::Retry);
        let stage = Arc::new(ScriptedStage::new("backup"));
        stage.fail_on("B", ["license denied"]);

        LoopRunner::new(harness.env(), stage.clone()).run().await;

        let requests = harness.decisions.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].choices, Choices::AbortRetryIgnore);
        assert!(requests[0].text.contains("ID: B"));
    }

    #[tokio::test]
    async fn test_stage_filter_skips_items_without_document() {
        let harness = Harness::new(sample_library());
        let stage = Arc::new(ScriptedStage::new("pdf").only_with_document());
        let summary = LoopRunner::new(harness.env(), stage.clone()).run().await;

        assert_eq!(stage.invoked_ids(), vec!["B"]);
        assert_eq!(summary.visited, 1);
        assert_eq!(harness.status("A"), LiberatedStatus::NotLiberated);
    }
}
