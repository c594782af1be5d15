//! Structured events broadcast by sprints.

use super::{SprintId, SprintState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a sprint notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SprintEventKind {
    /// Ordinary state change.
    StateChanged,
    /// The release pipeline succeeded.
    Released,
    /// The release pipeline failed and the sprint is finished again.
    ReleaseFailed,
    /// The running release was cancelled.
    ReleaseCancelled,
    /// The sprint review was recorded.
    Reviewed {
        /// Location of the review summary.
        document_path: String,
    },
    /// The sprint was closed.
    Closed,
}

/// Snapshot of a sprint change delivered to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintEvent {
    /// Sprint that changed.
    pub sprint_id: SprintId,
    /// Sprint name at the time of the change.
    pub name: String,
    /// State before the change.
    pub from: SprintState,
    /// State after the change.
    pub to: SprintState,
    /// Classification of the change.
    pub kind: SprintEventKind,
    /// When the change happened.
    pub occurred_at: DateTime<Utc>,
}

impl SprintEvent {
    /// Returns the human-readable notification text.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.kind {
            SprintEventKind::StateChanged => format!(
                "Sprint '{}' changed state from {} to {}",
                self.name, self.from, self.to
            ),
            SprintEventKind::Released => {
                format!("Sprint '{}' was released successfully", self.name)
            }
            SprintEventKind::ReleaseFailed => format!(
                "Pipeline execution failed for sprint '{}'; the sprint is back to {}",
                self.name, self.to
            ),
            SprintEventKind::ReleaseCancelled => {
                format!("Release for sprint '{}' was cancelled", self.name)
            }
            SprintEventKind::Reviewed { document_path } => format!(
                "Sprint '{}' has been reviewed. Summary: {document_path}",
                self.name
            ),
            SprintEventKind::Closed => format!("Sprint '{}' was closed", self.name),
        }
    }
}
