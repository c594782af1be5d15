//! Service layer for backlog item creation, assignment and lifecycle.

use crate::error::ErrorKind;
use crate::notification::{domain::DeliveryReport, services::UserObserverRegistry};
use crate::project::{
    domain::ProjectId,
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::shared::AggregateLockError;
use crate::user::{
    domain::{Role, User, UserId},
    ports::{UserRepository, UserRepositoryError},
};
use crate::work_item::{
    domain::{
        ActivityId, BacklogItem, BacklogItemAction, BacklogItemDomainError, BacklogItemId,
        ItemTransition, SharedBacklogItem, ThreadId,
    },
    ports::{BacklogItemRepository, BacklogItemRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for creating a backlog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBacklogItemRequest {
    title: String,
    description: String,
    story_points: u32,
}

impl CreateBacklogItemRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            story_points: 0,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the story point estimate.
    #[must_use]
    pub const fn with_story_points(mut self, story_points: u32) -> Self {
        self.story_points = story_points;
        self
    }
}

/// Service-level errors for backlog item operations.
#[derive(Debug, Error)]
pub enum BacklogItemServiceError {
    /// The aggregate refused the operation.
    #[error(transparent)]
    Domain(#[from] BacklogItemDomainError),
    /// Backlog item repository operation failed.
    #[error(transparent)]
    Repository(#[from] BacklogItemRepositoryError),
    /// User repository operation failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),
    /// Project repository operation failed.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),
    /// The backlog item lock was poisoned.
    #[error(transparent)]
    Lock(#[from] AggregateLockError),
    /// The backlog item does not exist.
    #[error("backlog item not found: {0}")]
    ItemNotFound(BacklogItemId),
    /// The user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),
    /// The user exists but is not a developer.
    #[error("user {user_id} is a {role}, not a developer")]
    NotADeveloper {
        /// User that was looked up.
        user_id: UserId,
        /// The user's actual role.
        role: Role,
    },
    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
}

impl BacklogItemServiceError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Repository(err) => err.kind(),
            Self::Users(err) => err.kind(),
            Self::Projects(err) => err.kind(),
            Self::Lock(err) => err.kind(),
            Self::ItemNotFound(_)
            | Self::UserNotFound(_)
            | Self::NotADeveloper { .. }
            | Self::ProjectNotFound(_) => ErrorKind::NotFound,
        }
    }
}

/// Result type for backlog item service operations.
pub type BacklogItemServiceResult<T> = Result<T, BacklogItemServiceError>;

/// Backlog item orchestration service.
#[derive(Clone)]
pub struct BacklogItemService<I, U, P, C>
where
    I: BacklogItemRepository,
    U: UserRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    items: Arc<I>,
    users: Arc<U>,
    projects: Arc<P>,
    observers: Arc<UserObserverRegistry>,
    clock: Arc<C>,
}

impl<I, U, P, C> BacklogItemService<I, U, P, C>
where
    I: BacklogItemRepository,
    U: UserRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new backlog item service.
    #[must_use]
    pub const fn new(
        items: Arc<I>,
        users: Arc<U>,
        projects: Arc<P>,
        observers: Arc<UserObserverRegistry>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            items,
            users,
            projects,
            observers,
            clock,
        }
    }

    /// Creates and stores a backlog item in `todo`.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemServiceError::Domain`] for a blank title and
    /// [`BacklogItemServiceError::Repository`] when storing fails.
    pub async fn create(
        &self,
        request: CreateBacklogItemRequest,
    ) -> BacklogItemServiceResult<SharedBacklogItem> {
        let item = BacklogItem::new(
            request.title,
            request.description,
            request.story_points,
            &*self.clock,
        )?;
        let handle = self.items.store(item).await?;
        info!(item_id = %handle.id(), "backlog item created");
        Ok(handle)
    }

    /// Adds an existing backlog item to a project's product backlog.
    ///
    /// Returns `false` when the item was already in the backlog.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemServiceError::ProjectNotFound`] or
    /// [`BacklogItemServiceError::ItemNotFound`] for unknown ids.
    pub async fn add_to_project_backlog(
        &self,
        project_id: ProjectId,
        item_id: BacklogItemId,
    ) -> BacklogItemServiceResult<bool> {
        self.get(item_id).await?;
        let mut project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or(BacklogItemServiceError::ProjectNotFound(project_id))?;
        if !project.add_backlog_item(item_id, &*self.clock) {
            return Ok(false);
        }
        self.projects.update(&project).await?;
        Ok(true)
    }

    /// Returns the handle for a backlog item.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemServiceError::ItemNotFound`] for unknown ids.
    pub async fn get(&self, item_id: BacklogItemId) -> BacklogItemServiceResult<SharedBacklogItem> {
        self.items
            .find_by_id(item_id)
            .await?
            .ok_or(BacklogItemServiceError::ItemNotFound(item_id))
    }

    /// Returns every backlog item handle.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemServiceError::Repository`] when the lookup fails.
    pub async fn list(&self) -> BacklogItemServiceResult<Vec<SharedBacklogItem>> {
        Ok(self.items.list_all().await?)
    }

    /// Assigns a developer, swapping the developer observer.
    ///
    /// The previous developer's observer is detached, the new developer's
    /// observer attached, and the new developer is told about the
    /// assignment.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemServiceError::UserNotFound`] for unknown users
    /// and [`BacklogItemServiceError::NotADeveloper`] for other roles.
    pub async fn assign_developer(
        &self,
        item_id: BacklogItemId,
        developer_id: UserId,
    ) -> BacklogItemServiceResult<DeliveryReport> {
        let handle = self.get(item_id).await?;
        let developer = self.developer(developer_id).await?;
        let observer = self.observers.observer_for(&developer);

        let title = {
            let mut item = handle.lock()?;
            let previous = item.assign_developer(Some(developer_id), &*self.clock);
            if let Some(previous_id) = previous.filter(|id| *id != developer_id) {
                item.detach_observer(previous_id.observer_id());
            }
            item.attach_observer(observer);
            item.title().to_owned()
        };

        info!(%item_id, developer_id = %developer_id, "developer assigned");
        Ok(self.observers.notifier().send(
            &format!("You have been assigned to backlog item '{title}'"),
            &developer,
        ))
    }

    /// Clears the assigned developer and detaches their observer.
    ///
    /// Returns the developer who was assigned, if any.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemServiceError::ItemNotFound`] for unknown items.
    pub async fn unassign_developer(
        &self,
        item_id: BacklogItemId,
    ) -> BacklogItemServiceResult<Option<UserId>> {
        let handle = self.get(item_id).await?;
        let mut item = handle.lock()?;
        let previous = item.assign_developer(None, &*self.clock);
        if let Some(previous_id) = previous {
            item.detach_observer(previous_id.observer_id());
        }
        Ok(previous)
    }

    /// Assigns a developer to a single activity.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemServiceError::NotADeveloper`] for other roles and
    /// [`BacklogItemServiceError::Domain`] for unknown activities.
    pub async fn assign_activity(
        &self,
        item_id: BacklogItemId,
        activity_id: ActivityId,
        developer_id: UserId,
    ) -> BacklogItemServiceResult<()> {
        let handle = self.get(item_id).await?;
        self.developer(developer_id).await?;
        handle
            .lock()?
            .assign_activity(activity_id, Some(developer_id), &*self.clock)?;
        Ok(())
    }

    /// Appends an activity to a backlog item.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemServiceError::ItemNotFound`] for unknown items and
    /// [`BacklogItemServiceError::Domain`] for a blank description.
    pub async fn add_activity(
        &self,
        item_id: BacklogItemId,
        description: &str,
    ) -> BacklogItemServiceResult<ActivityId> {
        let handle = self.get(item_id).await?;
        let activity_id = handle.lock()?.add_activity(description, &*self.clock)?;
        Ok(activity_id)
    }

    /// Removes an activity from a backlog item.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemServiceError::Domain`] for unknown activities.
    pub async fn remove_activity(
        &self,
        item_id: BacklogItemId,
        activity_id: ActivityId,
    ) -> BacklogItemServiceResult<()> {
        let handle = self.get(item_id).await?;
        handle.lock()?.remove_activity(activity_id, &*self.clock)?;
        Ok(())
    }

    /// Marks an activity as done and tells the assigned developer.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemServiceError::Domain`] for unknown activities.
    pub async fn mark_activity_done(
        &self,
        item_id: BacklogItemId,
        activity_id: ActivityId,
    ) -> BacklogItemServiceResult<DeliveryReport> {
        let handle = self.get(item_id).await?;
        let (developer, message) = {
            let mut item = handle.lock()?;
            item.mark_activity_done(activity_id, &*self.clock)?;
            let description = item
                .activities()
                .iter()
                .find(|activity| activity.id() == activity_id)
                .map(|activity| activity.description().to_owned())
                .unwrap_or_default();
            (
                item.assigned_developer(),
                format!(
                    "Activity '{description}' of backlog item '{}' is done",
                    item.title()
                ),
            )
        };
        let Some(developer_id) = developer else {
            return Ok(DeliveryReport::default());
        };
        let recipients = self.resolve_users(&[developer_id]).await?;
        Ok(self
            .observers
            .notifier()
            .send_to_many(&message, &recipients))
    }

    /// Attaches a user's observer to a backlog item.
    ///
    /// Returns `false` when the user already watches the item.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemServiceError::UserNotFound`] for unknown users.
    pub async fn watch(
        &self,
        item_id: BacklogItemId,
        user_id: UserId,
    ) -> BacklogItemServiceResult<bool> {
        let handle = self.get(item_id).await?;
        let user = self.user(user_id).await?;
        let observer = self.observers.observer_for(&user);
        Ok(handle.lock()?.attach_observer(observer))
    }

    /// Detaches a user's observer from a backlog item.
    ///
    /// Returns `false` when the user was not watching.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemServiceError::ItemNotFound`] for unknown items.
    pub async fn unwatch(
        &self,
        item_id: BacklogItemId,
        user_id: UserId,
    ) -> BacklogItemServiceResult<bool> {
        let handle = self.get(item_id).await?;
        Ok(handle.lock()?.detach_observer(user_id.observer_id()))
    }

    /// `todo → doing`.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemServiceError::Domain`] when the aggregate
    /// refuses the transition.
    pub async fn start_task(&self, item_id: BacklogItemId) -> BacklogItemServiceResult<ItemTransition> {
        self.transition(item_id, BacklogItemAction::StartTask).await
    }

    /// `doing → ready for testing`.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemServiceError::Domain`] when the aggregate
    /// refuses the transition.
    pub async fn mark_ready_for_testing(
        &self,
        item_id: BacklogItemId,
    ) -> BacklogItemServiceResult<ItemTransition> {
        self.transition(item_id, BacklogItemAction::MarkReadyForTesting)
            .await
    }

    /// `ready for testing → testing`.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemServiceError::Domain`] when the aggregate
    /// refuses the transition.
    pub async fn start_testing(
        &self,
        item_id: BacklogItemId,
    ) -> BacklogItemServiceResult<ItemTransition> {
        self.transition(item_id, BacklogItemAction::StartTesting)
            .await
    }

    /// Reports a test verdict.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemServiceError::Domain`] when the aggregate
    /// refuses the transition.
    pub async fn send_test_result(
        &self,
        item_id: BacklogItemId,
        passed: bool,
    ) -> BacklogItemServiceResult<ItemTransition> {
        self.transition(item_id, BacklogItemAction::test_result(passed))
            .await
    }

    /// `tested → done`.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemServiceError::Domain`] when the aggregate
    /// refuses the transition.
    pub async fn complete_task(
        &self,
        item_id: BacklogItemId,
    ) -> BacklogItemServiceResult<ItemTransition> {
        self.transition(item_id, BacklogItemAction::CompleteTask)
            .await
    }

    /// Any state `→ todo`.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemServiceError::ItemNotFound`] for unknown items.
    pub async fn reopen_task(
        &self,
        item_id: BacklogItemId,
    ) -> BacklogItemServiceResult<ItemTransition> {
        self.transition(item_id, BacklogItemAction::ReopenTask)
            .await
    }

    /// Opens a discussion thread on a backlog item.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemServiceError::Domain`] once the item is done or
    /// for a blank subject.
    pub async fn start_discussion(
        &self,
        item_id: BacklogItemId,
        subject: &str,
    ) -> BacklogItemServiceResult<ThreadId> {
        let handle = self.get(item_id).await?;
        let thread_id = handle.lock()?.start_discussion(subject, &*self.clock)?;
        Ok(thread_id)
    }

    /// Posts to the item's first discussion thread, opening one named after
    /// the item when none exists, and notifies the other participants.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemServiceError::UserNotFound`] for an unknown
    /// author and [`BacklogItemServiceError::Domain`] once the item is done
    /// or for a blank message.
    pub async fn post_discussion_message(
        &self,
        item_id: BacklogItemId,
        author_id: UserId,
        content: &str,
    ) -> BacklogItemServiceResult<DeliveryReport> {
        let handle = self.get(item_id).await?;
        let author = self.user(author_id).await?;

        let (recipients, message) = {
            let mut item = handle.lock()?;
            let recipients = item.post_to_first_thread(author_id, content, &*self.clock)?;
            let message = format!(
                "{} posted on '{}': {}",
                author.name(),
                item.title(),
                content.trim()
            );
            (recipients, message)
        };

        let users = self.resolve_users(&recipients).await?;
        Ok(self.observers.notifier().send_to_many(&message, &users))
    }

    async fn transition(
        &self,
        item_id: BacklogItemId,
        action: BacklogItemAction,
    ) -> BacklogItemServiceResult<ItemTransition> {
        let handle = self.get(item_id).await?;
        let transition = handle.lock()?.apply(action, &*self.clock)?;
        Ok(transition)
    }

    async fn user(&self, user_id: UserId) -> BacklogItemServiceResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(BacklogItemServiceError::UserNotFound(user_id))
    }

    async fn developer(&self, user_id: UserId) -> BacklogItemServiceResult<User> {
        let user = self.user(user_id).await?;
        if user.role() != Role::Developer {
            return Err(BacklogItemServiceError::NotADeveloper {
                user_id,
                role: user.role(),
            });
        }
        Ok(user)
    }

    async fn resolve_users(&self, ids: &[UserId]) -> BacklogItemServiceResult<Vec<User>> {
        let mut users = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(user) = self.users.find_by_id(*id).await? {
                users.push(user);
            }
        }
        Ok(users)
    }
}
