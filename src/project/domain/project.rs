//! Project aggregate.

use super::{ProjectDomainError, ProjectId};
use crate::sprint::domain::SprintId;
use crate::user::domain::UserId;
use crate::work_item::domain::BacklogItemId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A product with its owner, product backlog and sprints.
///
/// The product backlog and the sprint list keep insertion order and never
/// hold duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    product_owner: UserId,
    product_backlog: Vec<BacklogItemId>,
    sprints: Vec<SprintId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a project with an empty backlog.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyName`] for a blank name.
    pub fn new(
        name: impl Into<String>,
        product_owner: UserId,
        clock: &impl Clock,
    ) -> Result<Self, ProjectDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ProjectDomainError::EmptyName);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: ProjectId::new(),
            name: trimmed.to_owned(),
            product_owner,
            product_backlog: Vec::new(),
            sprints: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the Product Owner.
    #[must_use]
    pub const fn product_owner(&self) -> UserId {
        self.product_owner
    }

    /// Returns the product backlog in insertion order.
    #[must_use]
    pub fn product_backlog(&self) -> &[BacklogItemId] {
        &self.product_backlog
    }

    /// Returns the sprints in creation order.
    #[must_use]
    pub fn sprints(&self) -> &[SprintId] {
        &self.sprints
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Adds an item to the product backlog. Returns `false` if present.
    pub fn add_backlog_item(&mut self, item_id: BacklogItemId, clock: &impl Clock) -> bool {
        if !push_unique(&mut self.product_backlog, item_id) {
            return false;
        }
        self.touch(clock);
        true
    }

    /// Removes an item from the product backlog. Returns `false` if absent.
    pub fn remove_backlog_item(&mut self, item_id: BacklogItemId, clock: &impl Clock) -> bool {
        let before = self.product_backlog.len();
        self.product_backlog.retain(|existing| *existing != item_id);
        if self.product_backlog.len() == before {
            return false;
        }
        self.touch(clock);
        true
    }

    /// Registers a sprint. Returns `false` if already registered.
    pub fn register_sprint(&mut self, sprint_id: SprintId, clock: &impl Clock) -> bool {
        if !push_unique(&mut self.sprints, sprint_id) {
            return false;
        }
        self.touch(clock);
        true
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) -> bool {
    if items.contains(&item) {
        return false;
    }
    items.push(item);
    true
}
