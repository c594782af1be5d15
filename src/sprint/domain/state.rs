//! Sprint states, types, actions and the legality table.

use super::ParseSprintStateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SprintState {
    /// Being planned. Initial state; the only state where team and backlog
    /// change.
    Created,
    /// Work is under way.
    Running,
    /// The sprint period is over.
    Finished,
    /// A release pipeline is running.
    Releasing,
    /// The release pipeline succeeded.
    Released,
    /// The sprint review was recorded.
    Reviewed,
    /// The release was cancelled.
    Cancelled,
}

/// Every sprint state, in lifecycle order.
pub const ALL_SPRINT_STATES: [SprintState; 7] = [
    SprintState::Created,
    SprintState::Running,
    SprintState::Finished,
    SprintState::Releasing,
    SprintState::Released,
    SprintState::Reviewed,
    SprintState::Cancelled,
];

/// Kind of sprint, deciding how a finished sprint is wrapped up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SprintType {
    /// Ends with a review document.
    Review,
    /// Ends with a pipeline release.
    Release,
}

/// Mutation or transition requested on a sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SprintAction {
    /// Add a developer to the team.
    AddTeamMember,
    /// Remove a developer from the team.
    RemoveTeamMember,
    /// Add an item to the sprint backlog.
    AddBacklogItem,
    /// Remove an item from the sprint backlog.
    RemoveBacklogItem,
    /// Change the sprint name.
    Rename,
    /// Change the sprint dates.
    ChangeDates,
    /// Attach or replace the release pipeline.
    AttachPipeline,
    /// Start the sprint.
    StartSprint,
    /// Finish the sprint.
    FinishSprint,
    /// Start the release pipeline.
    StartRelease,
    /// Cancel a running release.
    CancelRelease,
    /// Apply a release pipeline result.
    HandleReleaseResult,
    /// Record the sprint review.
    ReviewSprint,
    /// Close the sprint.
    CloseSprint,
}

impl SprintState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Releasing => "releasing",
            Self::Released => "released",
            Self::Reviewed => "reviewed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether the sprint can be closed from this state.
    #[must_use]
    pub const fn is_closable(self) -> bool {
        matches!(self, Self::Released | Self::Reviewed | Self::Cancelled)
    }

    /// Returns whether `action` is legal in this state, ignoring the sprint
    /// type and business guards.
    #[must_use]
    pub const fn allows(self, action: SprintAction) -> bool {
        use SprintAction as Action;
        match self {
            Self::Created => matches!(
                action,
                Action::AddTeamMember
                    | Action::RemoveTeamMember
                    | Action::AddBacklogItem
                    | Action::RemoveBacklogItem
                    | Action::Rename
                    | Action::ChangeDates
                    | Action::AttachPipeline
                    | Action::StartSprint
            ),
            Self::Running => matches!(action, Action::AttachPipeline | Action::FinishSprint),
            Self::Finished => matches!(
                action,
                Action::AttachPipeline | Action::StartRelease | Action::ReviewSprint
            ),
            Self::Releasing => {
                matches!(action, Action::CancelRelease | Action::HandleReleaseResult)
            }
            Self::Released | Self::Reviewed | Self::Cancelled => {
                matches!(action, Action::CloseSprint)
            }
        }
    }

    /// Explains why `action` is refused in this state.
    #[must_use]
    pub const fn refusal(self, action: SprintAction) -> &'static str {
        use SprintAction as Action;
        match (self, action) {
            (Self::Created, Action::CloseSprint) => {
                "sprint must be released, reviewed or cancelled before closing"
            }
            (Self::Created, _) => "sprint has not started yet",
            (Self::Running, Action::StartSprint) => "sprint is already running",
            (Self::Running, Action::ChangeDates) => "cannot change dates while running",
            (Self::Running, Action::Rename) => "cannot rename the sprint while running",
            (
                Self::Running,
                Action::AddTeamMember
                | Action::RemoveTeamMember
                | Action::AddBacklogItem
                | Action::RemoveBacklogItem,
            ) => "cannot change the team or backlog while running",
            (Self::Running, _) => "sprint is still running",
            (Self::Finished, Action::FinishSprint | Action::StartSprint) => {
                "sprint is already finished"
            }
            (Self::Finished, Action::CancelRelease | Action::HandleReleaseResult) => {
                "no release is in progress"
            }
            (Self::Finished, Action::CloseSprint) => {
                "sprint must be released, reviewed or cancelled before closing"
            }
            (Self::Finished, _) => "cannot change sprint details after the sprint is finished",
            (Self::Releasing, Action::StartRelease) => "sprint release is already in progress",
            (Self::Releasing, Action::CloseSprint) => {
                "release must complete or be cancelled before closing"
            }
            (Self::Releasing, _) => "sprint is currently releasing",
            (Self::Released, _) => "sprint is already released",
            (Self::Reviewed, _) => "sprint is already reviewed",
            (Self::Cancelled, _) => "sprint release was cancelled",
        }
    }
}

impl fmt::Display for SprintState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SprintState {
    type Error = ParseSprintStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        ALL_SPRINT_STATES
            .into_iter()
            .find(|state| state.as_str() == normalized)
            .ok_or_else(|| ParseSprintStateError(value.to_owned()))
    }
}

impl SprintType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::Release => "release",
        }
    }

    /// Returns why `action` is forbidden for this sprint type, if it is.
    #[must_use]
    pub const fn forbids(self, action: SprintAction) -> Option<&'static str> {
        match (self, action) {
            (Self::Review, SprintAction::StartRelease | SprintAction::CancelRelease) => {
                Some("review sprints cannot be released")
            }
            (Self::Release, SprintAction::ReviewSprint) => {
                Some("release sprints cannot be reviewed")
            }
            _ => None,
        }
    }
}

impl fmt::Display for SprintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SprintAction {
    /// Returns a human-readable verb phrase for messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddTeamMember => "add team member",
            Self::RemoveTeamMember => "remove team member",
            Self::AddBacklogItem => "add backlog item",
            Self::RemoveBacklogItem => "remove backlog item",
            Self::Rename => "rename sprint",
            Self::ChangeDates => "change dates",
            Self::AttachPipeline => "attach pipeline",
            Self::StartSprint => "start sprint",
            Self::FinishSprint => "finish sprint",
            Self::StartRelease => "start release",
            Self::CancelRelease => "cancel release",
            Self::HandleReleaseResult => "handle release result",
            Self::ReviewSprint => "review sprint",
            Self::CloseSprint => "close sprint",
        }
    }
}

impl fmt::Display for SprintAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
