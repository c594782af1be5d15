//! Service layer for creating and looking up projects.

use crate::error::ErrorKind;
use crate::project::{
    domain::{Project, ProjectDomainError, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::user::{
    domain::{Role, UserId},
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for project operations.
#[derive(Debug, Error)]
pub enum ProjectServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),
    /// Project repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),
    /// User repository operation failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),
    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    /// The product owner is unknown or does not hold the role.
    #[error("product owner not found: {0}")]
    ProductOwnerNotFound(UserId),
}

impl ProjectServiceError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Repository(err) => err.kind(),
            Self::Users(err) => err.kind(),
            Self::ProjectNotFound(_) | Self::ProductOwnerNotFound(_) => ErrorKind::NotFound,
        }
    }
}

/// Result type for project service operations.
pub type ProjectServiceResult<T> = Result<T, ProjectServiceError>;

/// Project orchestration service.
#[derive(Clone)]
pub struct ProjectService<P, U, C>
where
    P: ProjectRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<P, U, C> ProjectService<P, U, C>
where
    P: ProjectRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub const fn new(projects: Arc<P>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            projects,
            users,
            clock,
        }
    }

    /// Creates a project owned by an existing Product Owner.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::ProductOwnerNotFound`] when the user is
    /// unknown or not a Product Owner, and [`ProjectServiceError::Domain`]
    /// for a blank name.
    pub async fn create_project(
        &self,
        name: &str,
        product_owner: UserId,
    ) -> ProjectServiceResult<Project> {
        let owner = self
            .users
            .find_by_id(product_owner)
            .await?
            .filter(|user| user.role() == Role::ProductOwner)
            .ok_or(ProjectServiceError::ProductOwnerNotFound(product_owner))?;
        let project = Project::new(name, owner.id(), &*self.clock)?;
        self.projects.store(&project).await?;
        info!(project_id = %project.id(), product_owner = %owner.id(), "project created");
        Ok(project)
    }

    /// Returns a project by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::ProjectNotFound`] for unknown ids.
    pub async fn get(&self, id: ProjectId) -> ProjectServiceResult<Project> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or(ProjectServiceError::ProjectNotFound(id))
    }

    /// Returns all projects.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when the lookup fails.
    pub async fn list(&self) -> ProjectServiceResult<Vec<Project>> {
        Ok(self.projects.list_all().await?)
    }
}
