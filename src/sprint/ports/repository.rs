//! Repository port for sprint handles.

use crate::error::ErrorKind;
use crate::project::domain::ProjectId;
use crate::sprint::domain::{SharedSprint, Sprint, SprintId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for sprint repository operations.
pub type SprintRepositoryResult<T> = Result<T, SprintRepositoryError>;

/// Sprint persistence contract.
#[async_trait]
pub trait SprintRepository: Send + Sync {
    /// Stores a new sprint and returns its shared handle.
    ///
    /// # Errors
    ///
    /// Returns [`SprintRepositoryError::DuplicateSprint`] when the identifier
    /// is already stored.
    async fn store(&self, sprint: Sprint) -> SprintRepositoryResult<SharedSprint>;

    /// Finds the handle for a sprint.
    async fn find_by_id(&self, id: SprintId) -> SprintRepositoryResult<Option<SharedSprint>>;

    /// Returns all handles in insertion order.
    async fn list_all(&self) -> SprintRepositoryResult<Vec<SharedSprint>>;

    /// Returns the sprints planned against one project, in insertion order.
    async fn list_by_project(&self, project_id: ProjectId)
    -> SprintRepositoryResult<Vec<SharedSprint>>;

    /// Removes a sprint.
    ///
    /// # Errors
    ///
    /// Returns [`SprintRepositoryError::NotFound`] for unknown ids.
    async fn delete(&self, id: SprintId) -> SprintRepositoryResult<()>;
}

/// Errors returned by sprint repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SprintRepositoryError {
    /// A sprint with the same identifier already exists.
    #[error("duplicate sprint identifier: {0}")]
    DuplicateSprint(SprintId),

    /// The sprint was not found.
    #[error("sprint not found: {0}")]
    NotFound(SprintId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SprintRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateSprint(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Persistence(_) => ErrorKind::Infrastructure,
        }
    }
}
