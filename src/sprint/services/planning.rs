//! Service layer for sprint planning, execution and release.

use crate::error::ErrorKind;
use crate::notification::{ports::NotificationService, services::UserObserverRegistry};
use crate::pipeline::DevelopmentPipeline;
use crate::project::{
    domain::ProjectId,
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::shared::AggregateLockError;
use crate::sprint::{
    domain::{
        ReleaseCallback, SharedSprint, Sprint, SprintAction, SprintDomainError, SprintDraft,
        SprintId, SprintPrecondition, SprintTransition,
    },
    ports::{ReleaseExecutor, ReleaseJob, ReleaseRequest, SprintRepository, SprintRepositoryError},
};
use crate::user::{
    domain::{Role, User, UserId},
    ports::{UserRepository, UserRepositoryError},
};
use crate::work_item::{
    domain::BacklogItemId,
    ports::{BacklogItemRepository, BacklogItemRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for sprint operations.
#[derive(Debug, Error)]
pub enum SprintServiceError {
    /// The aggregate refused the operation.
    #[error(transparent)]
    Domain(#[from] SprintDomainError),
    /// Sprint repository operation failed.
    #[error(transparent)]
    Repository(#[from] SprintRepositoryError),
    /// Backlog item repository operation failed.
    #[error(transparent)]
    Items(#[from] BacklogItemRepositoryError),
    /// User repository operation failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),
    /// Project repository operation failed.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),
    /// A sprint lock was poisoned.
    #[error(transparent)]
    Lock(#[from] AggregateLockError),
    /// The sprint does not exist.
    #[error("sprint not found: {0}")]
    SprintNotFound(SprintId),
    /// The backlog item does not exist.
    #[error("backlog item not found: {0}")]
    ItemNotFound(BacklogItemId),
    /// The user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),
    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    /// The user does not hold the role the operation needs.
    #[error("user {user_id} is a {actual}, expected a {expected}")]
    RoleMismatch {
        /// User that was looked up.
        user_id: UserId,
        /// Role the operation needs.
        expected: Role,
        /// Role the user holds.
        actual: Role,
    },
    /// The product owner named in the draft does not own the project.
    #[error("user {user_id} is not the product owner of project {project_id}")]
    NotProjectOwner {
        /// Project the sprint belongs to.
        project_id: ProjectId,
        /// User named as product owner.
        user_id: UserId,
    },
}

impl SprintServiceError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Repository(err) => err.kind(),
            Self::Items(err) => err.kind(),
            Self::Users(err) => err.kind(),
            Self::Projects(err) => err.kind(),
            Self::Lock(err) => err.kind(),
            Self::SprintNotFound(_)
            | Self::ItemNotFound(_)
            | Self::UserNotFound(_)
            | Self::ProjectNotFound(_)
            | Self::RoleMismatch { .. } => ErrorKind::NotFound,
            Self::NotProjectOwner { .. } => ErrorKind::Validation,
        }
    }
}

/// Result type for sprint service operations.
pub type SprintServiceResult<T> = Result<T, SprintServiceError>;

/// Sprint orchestration service.
#[derive(Clone)]
pub struct SprintService<S, I, U, P, C>
where
    S: SprintRepository,
    I: BacklogItemRepository,
    U: UserRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    sprints: Arc<S>,
    items: Arc<I>,
    users: Arc<U>,
    projects: Arc<P>,
    observers: Arc<UserObserverRegistry>,
    executor: Arc<dyn ReleaseExecutor>,
    clock: Arc<C>,
}

/// Repositories a [`SprintService`] reads and writes.
#[derive(Clone)]
pub struct SprintRepositories<S, I, U, P> {
    /// Sprint handles.
    pub sprints: Arc<S>,
    /// Backlog item handles.
    pub items: Arc<I>,
    /// Users.
    pub users: Arc<U>,
    /// Projects.
    pub projects: Arc<P>,
}

impl<S, I, U, P, C> SprintService<S, I, U, P, C>
where
    S: SprintRepository,
    I: BacklogItemRepository,
    U: UserRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new sprint service.
    #[must_use]
    pub fn new(
        repositories: SprintRepositories<S, I, U, P>,
        observers: Arc<UserObserverRegistry>,
        executor: Arc<dyn ReleaseExecutor>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            sprints: repositories.sprints,
            items: repositories.items,
            users: repositories.users,
            projects: repositories.projects,
            observers,
            executor,
            clock,
        }
    }

    /// Creates a sprint for a project.
    ///
    /// The Scrum Master must hold that role and the Product Owner must own
    /// the project. Both are attached as permanent observers and told about
    /// the new sprint, and the sprint is registered with the project.
    ///
    /// # Errors
    ///
    /// Returns [`SprintServiceError::Domain`] for a blank name or when the
    /// end date is not after the start date, and lookup errors for unknown
    /// projects or users.
    pub async fn create_sprint(&self, draft: SprintDraft) -> SprintServiceResult<SharedSprint> {
        let mut project = self
            .projects
            .find_by_id(draft.project_id)
            .await?
            .ok_or(SprintServiceError::ProjectNotFound(draft.project_id))?;
        let scrum_master = self.user_with_role(draft.scrum_master, Role::ScrumMaster).await?;
        let product_owner = self
            .user_with_role(draft.product_owner, Role::ProductOwner)
            .await?;
        if project.product_owner() != product_owner.id() {
            return Err(SprintServiceError::NotProjectOwner {
                project_id: project.id(),
                user_id: product_owner.id(),
            });
        }

        let sprint = Sprint::new(
            draft,
            self.observers.observer_for(&scrum_master),
            self.observers.observer_for(&product_owner),
            &*self.clock,
        )?;
        let name = sprint.name().to_owned();
        let handle = self.sprints.store(sprint).await?;
        if project.register_sprint(handle.id(), &*self.clock) {
            self.projects.update(&project).await?;
        }
        info!(sprint_id = %handle.id(), project_id = %project.id(), "sprint created");

        let report = self.observers.notifier().send_to_many(
            &format!("New sprint '{name}' created"),
            &[scrum_master, product_owner],
        );
        debug!(sprint_id = %handle.id(), delivered = report.delivered, "sprint stakeholders notified");
        Ok(handle)
    }

    /// Returns the handle for a sprint.
    ///
    /// # Errors
    ///
    /// Returns [`SprintServiceError::SprintNotFound`] for unknown ids.
    pub async fn get(&self, sprint_id: SprintId) -> SprintServiceResult<SharedSprint> {
        self.sprints
            .find_by_id(sprint_id)
            .await?
            .ok_or(SprintServiceError::SprintNotFound(sprint_id))
    }

    /// Returns every sprint handle.
    ///
    /// # Errors
    ///
    /// Returns [`SprintServiceError::Repository`] when the lookup fails.
    pub async fn list(&self) -> SprintServiceResult<Vec<SharedSprint>> {
        Ok(self.sprints.list_all().await?)
    }

    /// Returns the sprints planned against a project.
    ///
    /// # Errors
    ///
    /// Returns [`SprintServiceError::Repository`] when the lookup fails.
    pub async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> SprintServiceResult<Vec<SharedSprint>> {
        Ok(self.sprints.list_by_project(project_id).await?)
    }

    /// Adds a developer to the team and attaches their observer.
    ///
    /// # Errors
    ///
    /// Returns [`SprintServiceError::RoleMismatch`] for non-developers and
    /// [`SprintServiceError::Domain`] once the sprint left `created`.
    pub async fn add_team_member(
        &self,
        sprint_id: SprintId,
        developer_id: UserId,
    ) -> SprintServiceResult<bool> {
        let handle = self.get(sprint_id).await?;
        let developer = self.user_with_role(developer_id, Role::Developer).await?;
        let observer = self.observers.observer_for(&developer);
        let added = handle
            .lock()?
            .add_team_member(developer_id, observer, &*self.clock)?;
        Ok(added)
    }

    /// Removes a developer from the team.
    ///
    /// # Errors
    ///
    /// Returns [`SprintServiceError::Domain`] once the sprint left `created`.
    pub async fn remove_team_member(
        &self,
        sprint_id: SprintId,
        developer_id: UserId,
    ) -> SprintServiceResult<bool> {
        let handle = self.get(sprint_id).await?;
        let removed = handle
            .lock()?
            .remove_team_member(developer_id, &*self.clock)?;
        Ok(removed)
    }

    /// Adds a backlog item to the sprint backlog.
    ///
    /// # Errors
    ///
    /// Returns [`SprintServiceError::ItemNotFound`] for unknown items and
    /// [`SprintServiceError::Domain`] once the sprint left `created`.
    pub async fn add_backlog_item(
        &self,
        sprint_id: SprintId,
        item_id: BacklogItemId,
    ) -> SprintServiceResult<bool> {
        let handle = self.get(sprint_id).await?;
        let item = self
            .items
            .find_by_id(item_id)
            .await?
            .ok_or(SprintServiceError::ItemNotFound(item_id))?;
        let added = handle.lock()?.add_backlog_item(item, &*self.clock)?;
        Ok(added)
    }

    /// Removes a backlog item from the sprint backlog.
    ///
    /// # Errors
    ///
    /// Returns [`SprintServiceError::Domain`] once the sprint left `created`.
    pub async fn remove_backlog_item(
        &self,
        sprint_id: SprintId,
        item_id: BacklogItemId,
    ) -> SprintServiceResult<bool> {
        let handle = self.get(sprint_id).await?;
        let removed = handle.lock()?.remove_backlog_item(item_id, &*self.clock)?;
        Ok(removed)
    }

    /// Renames a sprint.
    ///
    /// # Errors
    ///
    /// Returns [`SprintServiceError::Domain`] once the sprint left `created`
    /// or for a blank name.
    pub async fn rename(&self, sprint_id: SprintId, name: &str) -> SprintServiceResult<()> {
        let handle = self.get(sprint_id).await?;
        handle.lock()?.rename(name, &*self.clock)?;
        Ok(())
    }

    /// Moves the sprint period.
    ///
    /// # Errors
    ///
    /// Returns [`SprintServiceError::Domain`] once the sprint left `created`
    /// or when `end <= start`.
    pub async fn change_dates(
        &self,
        sprint_id: SprintId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SprintServiceResult<()> {
        let handle = self.get(sprint_id).await?;
        handle.lock()?.change_dates(start, end, &*self.clock)?;
        Ok(())
    }

    /// Attaches or replaces the release pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`SprintServiceError::Domain`] once a release started.
    pub async fn attach_pipeline(
        &self,
        sprint_id: SprintId,
        pipeline: DevelopmentPipeline,
    ) -> SprintServiceResult<()> {
        let handle = self.get(sprint_id).await?;
        handle.lock()?.attach_pipeline(pipeline, &*self.clock)?;
        Ok(())
    }

    /// `created → running`.
    ///
    /// # Errors
    ///
    /// Returns [`SprintServiceError::Domain`] when the aggregate refuses.
    pub async fn start(&self, sprint_id: SprintId) -> SprintServiceResult<SprintTransition> {
        let handle = self.get(sprint_id).await?;
        let transition = handle.lock()?.start(&*self.clock)?;
        Ok(transition)
    }

    /// `running → finished`.
    ///
    /// # Errors
    ///
    /// Returns [`SprintServiceError::Domain`] when the aggregate refuses.
    pub async fn finish(&self, sprint_id: SprintId) -> SprintServiceResult<SprintTransition> {
        let handle = self.get(sprint_id).await?;
        let transition = handle.lock()?.finish(&*self.clock)?;
        Ok(transition)
    }

    /// Starts a release and hands the pipeline to the executor.
    ///
    /// The sprint is `releasing` when this returns. The installed callback
    /// tells the Scrum Master and Product Owner how the attempt ended.
    ///
    /// # Errors
    ///
    /// Returns [`SprintServiceError::Domain`] outside `finished`, for review
    /// sprints or without a pipeline.
    pub async fn initiate_release(&self, sprint_id: SprintId) -> SprintServiceResult<ReleaseJob> {
        let handle = self.get(sprint_id).await?;
        let (scrum_master_id, product_owner_id) = handle.with(|sprint| {
            (sprint.scrum_master(), sprint.product_owner())
        })?;
        let stakeholders = self
            .resolve_users(&[scrum_master_id, product_owner_id])
            .await?;
        let notifier = Arc::clone(self.observers.notifier());

        let (ticket, pipeline) = {
            let mut sprint = handle.lock()?;
            let callback = release_callback(notifier, stakeholders, sprint.name().to_owned());
            let ticket = sprint.start_release(callback, &*self.clock)?;
            let pipeline = sprint.pipeline().cloned().ok_or(
                SprintDomainError::PreconditionNotMet {
                    sprint_id,
                    action: SprintAction::StartRelease,
                    reason: SprintPrecondition::NoPipeline,
                },
            )?;
            (ticket, pipeline)
        };

        info!(%sprint_id, attempt = ticket.attempt, "release initiated");
        Ok(self.executor.execute(ReleaseRequest {
            pipeline,
            sprint: handle,
            ticket,
        }))
    }

    /// `releasing → cancelled`.
    ///
    /// # Errors
    ///
    /// Returns [`SprintServiceError::Domain`] when no release is running.
    pub async fn cancel_release(&self, sprint_id: SprintId) -> SprintServiceResult<SprintTransition> {
        let handle = self.get(sprint_id).await?;
        let transition = handle.lock()?.cancel_release(&*self.clock)?;
        Ok(transition)
    }

    /// Applies a pipeline outcome reported outside the executor.
    ///
    /// # Errors
    ///
    /// Returns [`SprintServiceError::Domain`] when no release is running.
    pub async fn handle_release_result(
        &self,
        sprint_id: SprintId,
        success: bool,
    ) -> SprintServiceResult<SprintTransition> {
        let handle = self.get(sprint_id).await?;
        let transition = handle
            .lock()?
            .handle_release_result(success, &*self.clock)?;
        Ok(transition)
    }

    /// `finished → reviewed`.
    ///
    /// # Errors
    ///
    /// Returns [`SprintServiceError::Domain`] outside `finished`, for release
    /// sprints or for a blank document path.
    pub async fn review(
        &self,
        sprint_id: SprintId,
        document_path: &str,
    ) -> SprintServiceResult<SprintTransition> {
        let handle = self.get(sprint_id).await?;
        let transition = handle.lock()?.review(document_path, &*self.clock)?;
        Ok(transition)
    }

    /// Closes a released, reviewed or cancelled sprint.
    ///
    /// # Errors
    ///
    /// Returns [`SprintServiceError::Domain`] from any other state.
    pub async fn close(&self, sprint_id: SprintId) -> SprintServiceResult<bool> {
        let handle = self.get(sprint_id).await?;
        let closed = handle.lock()?.close(&*self.clock)?;
        Ok(closed)
    }

    async fn user_with_role(&self, user_id: UserId, expected: Role) -> SprintServiceResult<User> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(SprintServiceError::UserNotFound(user_id))?;
        if user.role() != expected {
            return Err(SprintServiceError::RoleMismatch {
                user_id,
                expected,
                actual: user.role(),
            });
        }
        Ok(user)
    }

    async fn resolve_users(&self, ids: &[UserId]) -> SprintServiceResult<Vec<User>> {
        let mut users = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(user) = self.users.find_by_id(*id).await? {
                users.push(user);
            }
        }
        Ok(users)
    }
}

fn release_callback(
    notifier: Arc<dyn NotificationService>,
    recipients: Vec<User>,
    sprint_name: String,
) -> ReleaseCallback {
    ReleaseCallback::new(move |success| {
        let message = if success {
            format!("Sprint '{sprint_name}' successfully released")
        } else {
            format!("Release of sprint '{sprint_name}' did not complete")
        };
        let report = notifier.send_to_many(&message, &recipients);
        debug!(success, delivered = report.delivered, "release outcome delivered");
    })
}
