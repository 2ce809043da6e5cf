//! The stage boundary: notifications and fault containment.

use super::{Stage, StageContext};
use crate::core::{LibraryItem, PipelineEvent, StatusOutcome};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error};

/// Runs one stage against one item.
///
/// Emits [`PipelineEvent::Begin`] before and [`PipelineEvent::Completed`]
/// after the stage runs. A panic inside the stage is caught and reported as
/// a failure, so nothing crosses this boundary but a [`StatusOutcome`].
pub async fn invoke<S>(stage: &S, item: &LibraryItem, ctx: &StageContext) -> StatusOutcome
where
    S: Stage + ?Sized,
{
    ctx.events().emit(&PipelineEvent::Begin {
        stage: stage.name().to_string(),
        item: item.clone(),
    });
    debug!(stage = %stage.name(), product_id = %item.product_id, "Stage begin");

    let outcome = match AssertUnwindSafe(stage.process(item, ctx)).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(panic) => {
            let detail = panic_message(panic.as_ref());
            error!(stage = %stage.name(), product_id = %item.product_id, "Stage panicked: {}", detail);
            StatusOutcome::fail_many([
                format!("Unexpected error in stage '{}'", stage.name()),
                detail,
            ])
        }
    };

    ctx.events().emit(&PipelineEvent::Completed {
        stage: stage.name().to_string(),
        item: item.clone(),
        outcome: outcome.clone(),
    });

    outcome
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
