//! # Liberator
//!
//! Sequential, operator-supervised processing of a personal audiobook
//! library.
//!
//! A stage (decrypt the audio, fetch the companion document, transcode) is
//! bound to a runner that drives it over one item or over every eligible
//! item in the library:
//!
//! - **Stages** report a [`core::StatusOutcome`] and never fail the run
//! - **Failures** are put to an operator, who aborts the run, skips the item
//!   this time only, or skips it permanently
//! - **Skip records** are durable markers that keep an item out of future runs
//!   until a human clears them
//! - **Events** report every step to observers and to `tracing`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use liberator::prelude::*;
//!
//! let config = LiberatorConfig::from_file("liberator.json").await?;
//! let env = config
//!     .build_environment(Arc::new(config.unattended_surface()))
//!     .await?;
//!
//! let summary = LoopRunner::new(env, Arc::new(DecryptStage::new())).run().await;
//! println!("{} liberated", summary.succeeded);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod config;
pub mod controller;
pub mod core;
pub mod decision;
pub mod errors;
pub mod events;
pub mod observability;
pub mod queue;
pub mod runner;
pub mod skip;
pub mod stages;

#[cfg(test)]
mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::{LiberatorConfig, LoggingConfig};
    pub use crate::controller::{AutomationController, StageSet};
    pub use crate::core::{
        LiberatedStatus, LibraryItem, LogLevel, PipelineEvent, ProductId, StageKind,
        StatusOutcome,
    };
    pub use crate::decision::{
        ChannelDecisionSurface, Choices, DecisionRequest, DecisionSurface,
        FixedDecisionSurface, OperatorChoice, PendingDecision,
    };
    pub use crate::errors::{LiberatorError, Result};
    pub use crate::events::{CollectingEventSink, EventBus, EventSink, LoggingEventSink};
    pub use crate::observability::init_tracing;
    pub use crate::queue::{LibraryQueue, QueueSource};
    pub use crate::runner::{
        ContinuationAction, LoopRunner, RunEnvironment, RunSummary, RunnerVariant,
        SingleRunner, Termination,
    };
    pub use crate::skip::{
        FileSkipRecordStore, InMemorySkipRecordStore, SkipRecord, SkipRecordStore,
    };
    pub use crate::stages::{AsyncFnStage, CompositeStage, FnStage, Stage, StageContext};
}
