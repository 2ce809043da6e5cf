//! Testing utilities for liberation runs.
//!
//! This module provides:
//! - A scripted stage with per-item outcomes and call tracking
//! - A scripted decision surface with queued answers
//! - A harness wiring an in-memory library to a run environment

mod fixtures;
mod mocks;

pub use fixtures::{sample_library, Harness};
pub use mocks::{ScriptedDecisionSurface, ScriptedStage};
