//! Error types for pipeline construction.

use super::ActionKind;
use crate::error::ErrorKind;
use thiserror::Error;

/// Errors returned while assembling pipelines and actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The pipeline name is empty after trimming.
    #[error("pipeline name must not be empty")]
    EmptyPipelineName,

    /// The action name is empty after trimming.
    #[error("{0} action name must not be empty")]
    EmptyActionName(ActionKind),

    /// A required action parameter is missing or blank.
    #[error("missing or invalid parameter for {kind} action: {parameter}")]
    MissingParameter {
        /// Action being built.
        kind: ActionKind,
        /// Name of the offending parameter.
        parameter: &'static str,
    },
}

impl PipelineError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
