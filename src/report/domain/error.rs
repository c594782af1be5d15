//! Error types for report rendering.

use super::ReportFormat;
use crate::error::ErrorKind;
use crate::shared::AggregateLockError;
use thiserror::Error;

/// Errors raised while capturing or rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A sprint or backlog item could not be locked for the snapshot.
    #[error(transparent)]
    Lock(#[from] AggregateLockError),

    /// The template engine rejected the report.
    #[error("failed to render {format} report: {source}")]
    Render {
        /// Format being rendered.
        format: ReportFormat,
        /// Template engine failure.
        #[source]
        source: minijinja::Error,
    },
}

impl ReportError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Lock(err) => err.kind(),
            Self::Render { .. } => ErrorKind::Infrastructure,
        }
    }
}
