//! Store error types.

use inkpress_core::CoreError;
use thiserror::Error;

/// Errors surfaced by the template-config store and its services.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The stored document could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Domain-level decode or validation failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Failure inside a store backend.
    #[error("Store backend error: {0}")]
    Backend(String),
}
