//! Error types for the sprint domain.

use super::{SprintAction, SprintId, SprintState};
use crate::error::ErrorKind;
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// Business guard that refused an otherwise legal sprint transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SprintPrecondition {
    /// A sprint cannot start without developers.
    NoTeamMembers,
    /// A sprint cannot start with an empty backlog.
    NoBacklogItems,
    /// A sprint cannot start before its start date.
    BeforeStartDate,
    /// A release needs a pipeline to run.
    NoPipeline,
}

impl SprintPrecondition {
    /// Returns the human-readable reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoTeamMembers => "No team members assigned",
            Self::NoBacklogItems => "No backlog items in the sprint backlog",
            Self::BeforeStartDate => "The sprint start date has not been reached",
            Self::NoPipeline => "No pipeline associated",
        }
    }
}

impl fmt::Display for SprintPrecondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned while constructing or mutating sprints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SprintDomainError {
    /// The sprint name is empty after trimming.
    #[error("sprint name must not be empty")]
    EmptyName,

    /// The end date does not come after the start date.
    #[error("sprint end {end} must be after its start {start}")]
    InvalidDateRange {
        /// Requested start.
        start: DateTime<Utc>,
        /// Requested end.
        end: DateTime<Utc>,
    },

    /// The review document path is empty after trimming.
    #[error("review document path must not be empty")]
    EmptyReviewDocumentPath,

    /// The action is not legal in the sprint's current state or type.
    #[error("cannot {action} on sprint {sprint_id} ({state}): {reason}")]
    InvalidState {
        /// Sprint that refused the action.
        sprint_id: SprintId,
        /// Requested action.
        action: SprintAction,
        /// State at the time of the request.
        state: SprintState,
        /// Why the action is refused.
        reason: &'static str,
    },

    /// A business guard refused an otherwise legal transition.
    #[error("cannot {action} on sprint {sprint_id}: {reason}")]
    PreconditionNotMet {
        /// Sprint that refused the action.
        sprint_id: SprintId,
        /// Requested action.
        action: SprintAction,
        /// Guard that failed.
        reason: SprintPrecondition,
    },
}

impl SprintDomainError {
    /// Returns the caller-facing classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyName | Self::InvalidDateRange { .. } | Self::EmptyReviewDocumentPath => {
                ErrorKind::Validation
            }
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::PreconditionNotMet { .. } => ErrorKind::PreconditionNotMet,
        }
    }
}

/// Error returned while parsing sprint states from storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sprint state: {0}")]
pub struct ParseSprintStateError(pub String);
