//! Backlog item states, actions and the transition table.

use super::ParseBacklogItemStateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a backlog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BacklogItemState {
    /// Work has not started. Initial state.
    Todo,
    /// A developer is implementing the item.
    Doing,
    /// Implementation is finished and waits for a tester.
    ReadyForTesting,
    /// A tester is verifying the item.
    Testing,
    /// Testing passed.
    Tested,
    /// The item is complete. Only reopening leaves this state.
    Done,
}

/// Every backlog item state, in lifecycle order.
pub const ALL_ITEM_STATES: [BacklogItemState; 6] = [
    BacklogItemState::Todo,
    BacklogItemState::Doing,
    BacklogItemState::ReadyForTesting,
    BacklogItemState::Testing,
    BacklogItemState::Tested,
    BacklogItemState::Done,
];

/// Lifecycle action requested on a backlog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BacklogItemAction {
    /// Start implementing the item.
    StartTask,
    /// Hand the item over to testing.
    MarkReadyForTesting,
    /// Begin testing the item.
    StartTesting,
    /// Report a passing test result.
    PassTest,
    /// Report a failing test result.
    FailTest,
    /// Complete the item.
    CompleteTask,
    /// Send the item back to todo.
    ReopenTask,
}

/// Result of looking up an action in the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Install the given state.
    Move(BacklogItemState),
    /// The action is accepted but leaves the state untouched.
    Stay,
}

impl BacklogItemState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::ReadyForTesting => "ready_for_testing",
            Self::Testing => "testing",
            Self::Tested => "tested",
            Self::Done => "done",
        }
    }

    /// Looks up `action` in the transition table.
    ///
    /// Returns `None` when the action is illegal in this state. Guards on
    /// developer assignment and activity completion are evaluated by the
    /// aggregate, not here.
    #[must_use]
    pub const fn step(self, action: BacklogItemAction) -> Option<Step> {
        use BacklogItemAction as Action;
        match (self, action) {
            (Self::Todo, Action::StartTask) => Some(Step::Move(Self::Doing)),
            (Self::Doing, Action::MarkReadyForTesting) => Some(Step::Move(Self::ReadyForTesting)),
            (Self::ReadyForTesting, Action::StartTesting) => Some(Step::Move(Self::Testing)),
            (Self::Testing, Action::PassTest) => Some(Step::Move(Self::Tested)),
            (Self::Testing, Action::FailTest) => Some(Step::Move(Self::Todo)),
            (Self::Tested, Action::CompleteTask) => Some(Step::Move(Self::Done)),
            (
                Self::Doing | Self::ReadyForTesting | Self::Testing | Self::Tested | Self::Done,
                Action::ReopenTask,
            ) => Some(Step::Move(Self::Todo)),
            (Self::Todo, Action::ReopenTask)
            | (Self::ReadyForTesting, Action::MarkReadyForTesting)
            | (Self::Testing, Action::StartTesting) => Some(Step::Stay),
            _ => None,
        }
    }
}

impl fmt::Display for BacklogItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for BacklogItemState {
    type Error = ParseBacklogItemStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "doing" => Ok(Self::Doing),
            "ready_for_testing" => Ok(Self::ReadyForTesting),
            "testing" => Ok(Self::Testing),
            "tested" => Ok(Self::Tested),
            "done" => Ok(Self::Done),
            _ => Err(ParseBacklogItemStateError(value.to_owned())),
        }
    }
}

impl BacklogItemAction {
    /// Returns a human-readable verb phrase for messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartTask => "start task",
            Self::MarkReadyForTesting => "mark ready for testing",
            Self::StartTesting => "start testing",
            Self::PassTest => "send passing test result",
            Self::FailTest => "send failing test result",
            Self::CompleteTask => "complete task",
            Self::ReopenTask => "reopen task",
        }
    }

    /// Maps a test verdict onto its action.
    #[must_use]
    pub const fn test_result(passed: bool) -> Self {
        if passed { Self::PassTest } else { Self::FailTest }
    }
}

impl fmt::Display for BacklogItemAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
