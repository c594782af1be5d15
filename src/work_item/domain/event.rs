//! Structured events broadcast by backlog items.

use super::{BacklogItemAction, BacklogItemId, BacklogItemState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a backlog item state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BacklogItemEventKind {
    /// Ordinary forward progress.
    StateChanged,
    /// A tester reported a passing result.
    TestPassed,
    /// A tester rejected the item, sending it back to todo.
    TestRejected,
    /// The item was reopened.
    Reopened,
}

impl BacklogItemEventKind {
    /// Classifies the action that produced a state change.
    #[must_use]
    pub const fn for_action(action: BacklogItemAction) -> Self {
        match action {
            BacklogItemAction::PassTest => Self::TestPassed,
            BacklogItemAction::FailTest => Self::TestRejected,
            BacklogItemAction::ReopenTask => Self::Reopened,
            BacklogItemAction::StartTask
            | BacklogItemAction::MarkReadyForTesting
            | BacklogItemAction::StartTesting
            | BacklogItemAction::CompleteTask => Self::StateChanged,
        }
    }
}

/// Snapshot of a backlog item state change delivered to observers.
///
/// Observers receive this value rather than the aggregate, so they never
/// need to reach back into the item while it is locked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogItemEvent {
    /// Item that changed.
    pub item_id: BacklogItemId,
    /// Item title at the time of the change.
    pub title: String,
    /// State before the change.
    pub from: BacklogItemState,
    /// Newly installed state.
    pub to: BacklogItemState,
    /// Classification of the change.
    pub kind: BacklogItemEventKind,
    /// When the state was installed.
    pub occurred_at: DateTime<Utc>,
}

impl BacklogItemEvent {
    /// Returns the human-readable notification text.
    #[must_use]
    pub fn message(&self) -> String {
        match self.kind {
            BacklogItemEventKind::StateChanged => format!(
                "Backlog item '{}' moved from {} to {}",
                self.title, self.from, self.to
            ),
            BacklogItemEventKind::TestPassed => {
                format!("Testing passed for backlog item '{}'", self.title)
            }
            BacklogItemEventKind::TestRejected => format!(
                "Backlog item '{}' was rejected by the tester and moved back to {}",
                self.title, self.to
            ),
            BacklogItemEventKind::Reopened => format!(
                "Backlog item '{}' was reopened from {}",
                self.title, self.from
            ),
        }
    }
}
