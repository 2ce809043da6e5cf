//! Processing of one item, shared by both runners.

use super::{ContinuationAction, RunEnvironment, RunSummary, RunnerVariant, Termination};
use super::{DONE_MESSAGE, PROCESSING_FAILED_MESSAGE};
use crate::core::{LiberatedStatus, LibraryItem, PipelineEvent, StatusOutcome};
use crate::decision::{DecisionRequest, DECISION_CAPTION};
use crate::errors::Result;
use crate::skip::{render_details, SkipRecord, DETAILS_PLACEHOLDER};
use crate::stages::{invoke, Stage, StageContext};
use std::any::Any;
use tracing::{error, info, warn};

/// How one item ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    Succeeded,
    SkippedOnce,
    SkippedPermanently,
    Aborted,
}

impl Resolution {
    pub(crate) fn record(self, summary: &mut RunSummary) {
        summary.visited += 1;
        match self {
            Self::Succeeded => summary.succeeded += 1,
            Self::SkippedOnce => summary.skipped_once += 1,
            Self::SkippedPermanently => summary.skipped_permanently += 1,
            Self::Aborted => {}
        }
    }
}

/// Runs the bound stage on an item and resolves a failure with the operator.
pub(crate) struct ItemProcessor<'a> {
    env: &'a RunEnvironment,
    stage: &'a dyn Stage,
    variant: RunnerVariant,
    ctx: StageContext,
}

impl<'a> ItemProcessor<'a> {
    pub(crate) fn new(
        env: &'a RunEnvironment,
        stage: &'a dyn Stage,
        variant: RunnerVariant,
        ctx: StageContext,
    ) -> Self {
        Self {
            env,
            stage,
            variant,
            ctx,
        }
    }

    pub(crate) async fn process(&self, item: &LibraryItem) -> Result<Resolution> {
        let outcome = invoke(self.stage, item, &self.ctx).await;

        if outcome.is_success() {
            for kind in self.stage.completed_kinds(item) {
                self.env
                    .queue
                    .update_status(&item.product_id, kind, LiberatedStatus::Liberated)
                    .await?;
            }
            return Ok(Resolution::Succeeded);
        }

        for message in outcome.messages() {
            self.env.events.error(message.clone());
        }
        self.env.events.error(PROCESSING_FAILED_MESSAGE);

        let details = self.describe(item).await;
        let request = DecisionRequest {
            item: item.clone(),
            failure: outcome.clone(),
            choices: self.variant.choices(),
            caption: DECISION_CAPTION.to_string(),
            text: self.variant.prompt_text(&details),
        };

        let choice = self.env.decisions.decide(&request).await?;
        let action = self.variant.resolve(choice);
        info!(
            product_id = %item.product_id,
            choice = %choice,
            action = ?action,
            "Failure resolved"
        );

        match action {
            ContinuationAction::Abort => Ok(Resolution::Aborted),
            ContinuationAction::SkipOnce => {
                self.env.events.info(format!(
                    "Skipped this time only\n  [{}] {}",
                    item.product_id, item.title
                ));
                Ok(Resolution::SkippedOnce)
            }
            ContinuationAction::SkipPermanently => {
                self.skip_permanently(item, &outcome, details).await?;
                Ok(Resolution::SkippedPermanently)
            }
        }
    }

    /// Renders the details of the item as the library currently has it.
    async fn describe(&self, item: &LibraryItem) -> String {
        match self.env.queue.validate_single(&item.product_id).await {
            Ok(current) => render_details(&current, &self.env.detail_format),
            Err(e) => {
                warn!(product_id = %item.product_id, error = %e, "Cannot read item details");
                DETAILS_PLACEHOLDER.to_string()
            }
        }
    }

    async fn skip_permanently(
        &self,
        item: &LibraryItem,
        outcome: &StatusOutcome,
        details: String,
    ) -> Result<()> {
        let record = SkipRecord::for_failure(item, outcome, details);
        let location = self.env.skip_records.create(&record).await?;
        self.env
            .queue
            .update_status(&item.product_id, self.stage.kind(), LiberatedStatus::PermanentlySkipped)
            .await?;

        self.env.events.info(format!(
            "Created new 'skip' file\n  [{}] {}\n  {}",
            item.product_id, item.title, location
        ));
        Ok(())
    }
}

/// Turns the result of a run body into its termination, logging faults.
pub(crate) fn conclude(
    env: &RunEnvironment,
    result: std::result::Result<Result<Termination>, Box<dyn Any + Send>>,
) -> Termination {
    match result {
        Ok(Ok(termination)) => termination,
        Ok(Err(e)) => {
            error!(error = %e, "Run failed");
            env.events.error(format!("Run stopped by an unexpected error: {e}"));
            Termination::Fatal(e.to_string())
        }
        Err(panic) => {
            let message = crate::stages::panic_message(panic.as_ref());
            error!("Run panicked: {}", message);
            env.events.error(format!("Run stopped by an unexpected error: {message}"));
            Termination::Fatal(message)
        }
    }
}

/// Closes a run: final log line and the done notification.
pub(crate) fn finish(env: &RunEnvironment, summary: RunSummary, termination: Termination) -> RunSummary {
    let summary = summary.finish(termination);
    if matches!(summary.termination, Termination::Fatal(_)) {
        warn!(run_id = %summary.run_id, "Run ended early");
    }
    env.events.info(DONE_MESSAGE);
    env.events.emit(&PipelineEvent::Done(summary.clone()));
    summary
}
