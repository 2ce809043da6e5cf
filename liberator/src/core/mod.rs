//! Core domain model types for the liberation pipeline.
//!
//! This module contains the fundamental types used throughout the crate:
//! - Library items and their liberation status
//! - Stage kinds
//! - Per-invocation status outcomes
//! - Pipeline events delivered to observers

mod event;
mod item;
mod outcome;
mod status;

pub use event::{LogLevel, PipelineEvent};
pub use item::{LibraryItem, ProductId};
pub use outcome::StatusOutcome;
pub use status::{LiberatedStatus, StageKind};
