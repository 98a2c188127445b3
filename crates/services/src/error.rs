//! Shared error types for the services crate.

use thiserror::Error;

use bonds_core::model::RecordError;

/// Errors emitted by `ProgressTracker`.
///
/// Only explicit edits can fail; answering and resetting absorb storage
/// failures and log them instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TrackerError {
    #[error(transparent)]
    Record(#[from] RecordError),
}
