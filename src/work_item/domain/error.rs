//! Error types for the backlog item domain.

use super::{ActivityId, BacklogItemAction, BacklogItemId, BacklogItemState, ThreadId};
use crate::error::ErrorKind;
use std::fmt;
use thiserror::Error;

/// Guard that refused an otherwise legal backlog item transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemPrecondition {
    /// Work cannot start without an assigned developer.
    NoDeveloperAssigned,
    /// The item cannot be completed while activities are still open.
    ActivitiesIncomplete,
}

impl ItemPrecondition {
    /// Returns the human-readable reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoDeveloperAssigned => "No developer assigned",
            Self::ActivitiesIncomplete => "Not all its activities are marked as done",
        }
    }
}

impl fmt::Display for ItemPrecondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned while constructing or mutating backlog items.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BacklogItemDomainError {
    /// The title is empty after trimming.
    #[error("backlog item title must not be empty")]
    EmptyTitle,

    /// The activity description is empty after trimming.
    #[error("activity description must not be empty")]
    EmptyActivityDescription,

    /// The discussion subject is empty after trimming.
    #[error("discussion subject must not be empty")]
    EmptyThreadSubject,

    /// The discussion message is empty after trimming.
    #[error("discussion message must not be empty")]
    EmptyMessage,

    /// The action is not legal in the item's current state.
    #[error("cannot {action} on backlog item {item_id} while it is {state}")]
    InvalidState {
        /// Backlog item that refused the action.
        item_id: BacklogItemId,
        /// Requested action.
        action: BacklogItemAction,
        /// State at the time of the request.
        state: BacklogItemState,
    },

    /// A guard refused an otherwise legal transition.
    #[error("cannot {action} on backlog item {item_id}: {reason}")]
    PreconditionNotMet {
        /// Backlog item that refused the action.
        item_id: BacklogItemId,
        /// Requested action.
        action: BacklogItemAction,
        /// Guard that failed.
        reason: ItemPrecondition,
    },

    /// Discussions are closed once the item is done.
    #[error("backlog item {0} is done and its discussions are closed")]
    CompletedItemImmutable(BacklogItemId),

    /// The activity does not belong to the item.
    #[error("activity {activity_id} not found on backlog item {item_id}")]
    ActivityNotFound {
        /// Backlog item that was searched.
        item_id: BacklogItemId,
        /// Missing activity.
        activity_id: ActivityId,
    },

    /// The discussion thread does not belong to the item.
    #[error("discussion thread {thread_id} not found on backlog item {item_id}")]
    ThreadNotFound {
        /// Backlog item that was searched.
        item_id: BacklogItemId,
        /// Missing thread.
        thread_id: ThreadId,
    },
}

impl BacklogItemDomainError {
    /// Returns the caller-facing classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyTitle
            | Self::EmptyActivityDescription
            | Self::EmptyThreadSubject
            | Self::EmptyMessage => ErrorKind::Validation,
            Self::InvalidState { .. } | Self::CompletedItemImmutable(_) => ErrorKind::InvalidState,
            Self::PreconditionNotMet { .. } => ErrorKind::PreconditionNotMet,
            Self::ActivityNotFound { .. } | Self::ThreadNotFound { .. } => ErrorKind::NotFound,
        }
    }
}

/// Error returned while parsing backlog item states from storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown backlog item state: {0}")]
pub struct ParseBacklogItemStateError(pub String);
