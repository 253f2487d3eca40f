//! Shared error types for the services crate.

use thiserror::Error;

use mastery_core::model::MasteryModelError;

/// Errors emitted while decoding host state into a `MasterySnapshot`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Model(#[from] MasteryModelError),
}
