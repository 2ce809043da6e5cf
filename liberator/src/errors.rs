//! Error types for the liberation pipeline.
//!
//! Stage failures are not errors: they travel as
//! [`StatusOutcome::Failure`](crate::core::StatusOutcome). A
//! [`LiberatorError`] is a fault outside that channel (a store that cannot be
//! read, a skip record that cannot be written, a decision surface that went
//! away) and ends the run.

use crate::core::ProductId;
use thiserror::Error;

/// Convenience result alias.
pub type Result<T, E = LiberatorError> = std::result::Result<T, E>;

/// The main error type for liberator operations.
#[derive(Debug, Error)]
pub enum LiberatorError {
    /// The requested item is not in the library.
    #[error("Library item not found: {0}")]
    NotFound(ProductId),

    /// The library store failed.
    #[error("Library store error: {0}")]
    Store(String),

    /// A skip record could not be written, read or cleared.
    #[error("Skip record error for {product_id}: {message}")]
    SkipRecord {
        /// Item the record belongs to.
        product_id: ProductId,
        /// What went wrong.
        message: String,
    },

    /// The decision surface could not produce a decision.
    #[error("Decision surface error: {0}")]
    Decision(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LiberatorError {
    /// Creates a skip record error.
    #[must_use]
    pub fn skip_record(product_id: &ProductId, message: impl Into<String>) -> Self {
        Self::SkipRecord {
            product_id: product_id.clone(),
            message: message.into(),
        }
    }

    /// Returns true if this is a not-found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = LiberatorError::NotFound(ProductId::from("B0001"));
        assert_eq!(err.to_string(), "Library item not found: B0001");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_skip_record_display() {
        let err = LiberatorError::skip_record(&ProductId::from("B0002"), "read-only directory");
        assert!(err.to_string().contains("B0002"));
        assert!(err.to_string().contains("read-only directory"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: LiberatorError = io.into();
        assert!(matches!(err, LiberatorError::Io(_)));
    }

    #[test]
    fn test_serde_conversion() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: LiberatorError = parse.into();
        assert!(err.to_string().starts_with("Serialization error"));
    }
}
