//! Activities: the leaves of a backlog item.

use super::{ActivityId, BacklogItemDomainError};
use crate::user::domain::UserId;
use serde::{Deserialize, Serialize};

/// A unit of work inside a backlog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    id: ActivityId,
    description: String,
    done: bool,
    assigned_developer: Option<UserId>,
}

impl Activity {
    /// Creates an open activity.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemDomainError::EmptyActivityDescription`] when the
    /// description is blank.
    pub fn new(description: impl Into<String>) -> Result<Self, BacklogItemDomainError> {
        let raw = description.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BacklogItemDomainError::EmptyActivityDescription);
        }
        Ok(Self {
            id: ActivityId::new(),
            description: trimmed.to_owned(),
            done: false,
            assigned_developer: None,
        })
    }

    /// Returns the activity identifier.
    #[must_use]
    pub const fn id(&self) -> ActivityId {
        self.id
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns whether the activity is done.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// Returns the developer working on the activity, if any.
    #[must_use]
    pub const fn assigned_developer(&self) -> Option<UserId> {
        self.assigned_developer
    }

    pub(super) const fn mark_done(&mut self) {
        self.done = true;
    }

    pub(super) const fn assign(&mut self, developer: Option<UserId>) {
        self.assigned_developer = developer;
    }
}
