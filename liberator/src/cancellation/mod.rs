//! Cooperative cancellation for runs.
//!
//! A run observes its token only between items, never in the middle of one.

mod token;

pub use token::CancellationToken;
