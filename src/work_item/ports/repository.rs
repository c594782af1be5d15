//! Repository port for backlog item handles.
//!
//! Backlog items are shared between the product backlog, sprint backlogs and
//! in-flight use cases, so the repository hands out [`SharedBacklogItem`]
//! handles rather than copies. Mutation happens through the handle's lock.

use crate::error::ErrorKind;
use crate::work_item::domain::{BacklogItem, BacklogItemId, SharedBacklogItem};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for backlog item repository operations.
pub type BacklogItemRepositoryResult<T> = Result<T, BacklogItemRepositoryError>;

/// Backlog item persistence contract.
#[async_trait]
pub trait BacklogItemRepository: Send + Sync {
    /// Stores a new backlog item and returns its shared handle.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemRepositoryError::DuplicateBacklogItem`] when the
    /// identifier is already stored.
    async fn store(&self, item: BacklogItem) -> BacklogItemRepositoryResult<SharedBacklogItem>;

    /// Finds the handle for a backlog item.
    async fn find_by_id(
        &self,
        id: BacklogItemId,
    ) -> BacklogItemRepositoryResult<Option<SharedBacklogItem>>;

    /// Returns all handles in insertion order.
    async fn list_all(&self) -> BacklogItemRepositoryResult<Vec<SharedBacklogItem>>;

    /// Removes a backlog item.
    ///
    /// Outstanding handles stay usable; they are simply no longer findable.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemRepositoryError::NotFound`] for unknown ids.
    async fn delete(&self, id: BacklogItemId) -> BacklogItemRepositoryResult<()>;
}

/// Errors returned by backlog item repository implementations.
#[derive(Debug, Clone, Error)]
pub enum BacklogItemRepositoryError {
    /// A backlog item with the same identifier already exists.
    #[error("duplicate backlog item identifier: {0}")]
    DuplicateBacklogItem(BacklogItemId),

    /// The backlog item was not found.
    #[error("backlog item not found: {0}")]
    NotFound(BacklogItemId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BacklogItemRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateBacklogItem(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Persistence(_) => ErrorKind::Infrastructure,
        }
    }
}
