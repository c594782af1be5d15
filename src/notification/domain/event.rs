//! Tagged lifecycle events consumed by user observers.

use crate::sprint::domain::SprintEvent;
use crate::work_item::domain::BacklogItemEvent;
use serde::{Deserialize, Serialize};

/// An event from either lifecycle, tagged by subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "subject", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// A backlog item changed state.
    Item(BacklogItemEvent),
    /// A sprint changed state or was closed.
    Sprint(SprintEvent),
}

impl LifecycleEvent {
    /// Returns the human-readable notification text.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Item(event) => event.message(),
            Self::Sprint(event) => event.message(),
        }
    }
}

impl From<BacklogItemEvent> for LifecycleEvent {
    fn from(event: BacklogItemEvent) -> Self {
        Self::Item(event)
    }
}

impl From<SprintEvent> for LifecycleEvent {
    fn from(event: SprintEvent) -> Self {
        Self::Sprint(event)
    }
}
