//! Backlog item aggregate and its transition engine.

use super::{
    Activity, ActivityId, BacklogItemAction, BacklogItemDomainError, BacklogItemEvent,
    BacklogItemEventKind, BacklogItemId, BacklogItemState, DiscussionThread, ItemPrecondition,
    Step, ThreadId, WorkItem,
};
use crate::observer::{Observer, ObserverId, ObserverSet};
use crate::shared::{Identified, Shared};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Shared, lock-protected handle to a backlog item.
pub type SharedBacklogItem = Shared<BacklogItem>;

/// Outcome of a lifecycle request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemTransition {
    /// A new state was installed and observers were notified.
    Moved {
        /// State before the transition.
        from: BacklogItemState,
        /// Newly installed state.
        to: BacklogItemState,
    },
    /// The request was an accepted no-op; nobody was notified.
    Unchanged(BacklogItemState),
}

impl ItemTransition {
    /// Returns the state after the request.
    #[must_use]
    pub const fn state(self) -> BacklogItemState {
        match self {
            Self::Moved { to, .. } => to,
            Self::Unchanged(state) => state,
        }
    }

    /// Returns whether a new state was installed.
    #[must_use]
    pub const fn is_change(self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// A unit of product work tracked through testing to completion.
#[derive(Debug)]
pub struct BacklogItem {
    id: BacklogItemId,
    title: String,
    description: String,
    story_points: u32,
    assigned_developer: Option<UserId>,
    activities: Vec<Activity>,
    discussions: Vec<DiscussionThread>,
    state: BacklogItemState,
    observers: ObserverSet<BacklogItemEvent>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BacklogItem {
    /// Creates a backlog item in [`BacklogItemState::Todo`].
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemDomainError::EmptyTitle`] when the title is blank.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        story_points: u32,
        clock: &impl Clock,
    ) -> Result<Self, BacklogItemDomainError> {
        let raw_title = title.into();
        let trimmed = raw_title.trim();
        if trimmed.is_empty() {
            return Err(BacklogItemDomainError::EmptyTitle);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: BacklogItemId::new(),
            title: trimmed.to_owned(),
            description: description.into(),
            story_points,
            assigned_developer: None,
            activities: Vec::new(),
            discussions: Vec::new(),
            state: BacklogItemState::Todo,
            observers: ObserverSet::new(),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the backlog item identifier.
    #[must_use]
    pub const fn id(&self) -> BacklogItemId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the story point estimate.
    #[must_use]
    pub const fn story_points(&self) -> u32 {
        self.story_points
    }

    /// Returns the assigned developer, if any.
    #[must_use]
    pub const fn assigned_developer(&self) -> Option<UserId> {
        self.assigned_developer
    }

    /// Returns the activities in insertion order.
    #[must_use]
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Returns the discussion threads in creation order.
    #[must_use]
    pub fn discussions(&self) -> &[DiscussionThread] {
        &self.discussions
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> BacklogItemState {
        self.state
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

    /// Returns whether the item is complete: in `done` with every activity
    /// done. Never mutates state.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state == BacklogItemState::Done && self.activities_done()
    }

    /// Returns whether every activity is done. Vacuously true without
    /// activities.
    #[must_use]
    pub fn activities_done(&self) -> bool {
        self.activities.iter().all(Activity::is_done)
    }

    /// Returns the number of completed activities.
    #[must_use]
    pub fn completed_activity_count(&self) -> usize {
        self.activities.iter().filter(|activity| activity.is_done()).count()
    }

    /// Replaces the assigned developer and returns the previous one.
    pub fn assign_developer(
        &mut self,
        developer: Option<UserId>,
        clock: &impl Clock,
    ) -> Option<UserId> {
        let previous = std::mem::replace(&mut self.assigned_developer, developer);
        self.touch(clock);
        previous
    }

    /// Attaches an observer. Returns `false` when it was already attached.
    pub fn attach_observer(&mut self, observer: Arc<dyn Observer<BacklogItemEvent>>) -> bool {
        self.observers.attach(observer)
    }

    /// Detaches an observer. Returns `false` when it was not attached.
    pub fn detach_observer(&mut self, observer_id: ObserverId) -> bool {
        self.observers.detach(observer_id)
    }

    /// Returns the attached observer identities in attachment order.
    #[must_use]
    pub fn observer_ids(&self) -> Vec<ObserverId> {
        self.observers.ids()
    }

    /// Appends an open activity and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemDomainError::EmptyActivityDescription`] when the
    /// description is blank.
    pub fn add_activity(
        &mut self,
        description: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<ActivityId, BacklogItemDomainError> {
        let activity = Activity::new(description)?;
        let activity_id = activity.id();
        self.activities.push(activity);
        self.touch(clock);
        Ok(activity_id)
    }

    /// Removes an activity and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemDomainError::ActivityNotFound`] for unknown ids.
    pub fn remove_activity(
        &mut self,
        activity_id: ActivityId,
        clock: &impl Clock,
    ) -> Result<Activity, BacklogItemDomainError> {
        let position = self
            .activities
            .iter()
            .position(|activity| activity.id() == activity_id)
            .ok_or(BacklogItemDomainError::ActivityNotFound {
                item_id: self.id,
                activity_id,
            })?;
        let removed = self.activities.remove(position);
        self.touch(clock);
        Ok(removed)
    }

    /// Marks an activity as done. Marking a done activity again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemDomainError::ActivityNotFound`] for unknown ids.
    pub fn mark_activity_done(
        &mut self,
        activity_id: ActivityId,
        clock: &impl Clock,
    ) -> Result<(), BacklogItemDomainError> {
        self.activity_mut(activity_id)?.mark_done();
        self.touch(clock);
        Ok(())
    }

    /// Assigns a developer to one activity.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemDomainError::ActivityNotFound`] for unknown ids.
    pub fn assign_activity(
        &mut self,
        activity_id: ActivityId,
        developer: Option<UserId>,
        clock: &impl Clock,
    ) -> Result<(), BacklogItemDomainError> {
        self.activity_mut(activity_id)?.assign(developer);
        self.touch(clock);
        Ok(())
    }

    /// `todo → doing`. Requires an assigned developer.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemDomainError::InvalidState`] outside `todo` and
    /// [`BacklogItemDomainError::PreconditionNotMet`] without a developer.
    pub fn start_task(
        &mut self,
        clock: &impl Clock,
    ) -> Result<ItemTransition, BacklogItemDomainError> {
        self.apply(BacklogItemAction::StartTask, clock)
    }

    /// `doing → ready for testing`; a no-op when already ready.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemDomainError::InvalidState`] in any other state.
    pub fn mark_ready_for_testing(
        &mut self,
        clock: &impl Clock,
    ) -> Result<ItemTransition, BacklogItemDomainError> {
        self.apply(BacklogItemAction::MarkReadyForTesting, clock)
    }

    /// `ready for testing → testing`; a no-op when already testing.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemDomainError::InvalidState`] in any other state.
    pub fn start_testing(
        &mut self,
        clock: &impl Clock,
    ) -> Result<ItemTransition, BacklogItemDomainError> {
        self.apply(BacklogItemAction::StartTesting, clock)
    }

    /// `testing → tested` on a pass, `testing → todo` on a rejection.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemDomainError::InvalidState`] outside `testing`.
    pub fn send_test_result(
        &mut self,
        passed: bool,
        clock: &impl Clock,
    ) -> Result<ItemTransition, BacklogItemDomainError> {
        self.apply(BacklogItemAction::test_result(passed), clock)
    }

    /// `tested → done`. Requires every activity to be done.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemDomainError::InvalidState`] outside `tested` and
    /// [`BacklogItemDomainError::PreconditionNotMet`] with open activities.
    pub fn complete_task(
        &mut self,
        clock: &impl Clock,
    ) -> Result<ItemTransition, BacklogItemDomainError> {
        self.apply(BacklogItemAction::CompleteTask, clock)
    }

    /// Any state `→ todo`; a no-op when already in `todo`.
    ///
    /// # Errors
    ///
    /// Reopening is legal from every state; the result type matches the
    /// other lifecycle actions.
    pub fn reopen_task(
        &mut self,
        clock: &impl Clock,
    ) -> Result<ItemTransition, BacklogItemDomainError> {
        self.apply(BacklogItemAction::ReopenTask, clock)
    }

    /// Dispatches `action` through the transition table.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemDomainError::InvalidState`] for illegal actions
    /// and [`BacklogItemDomainError::PreconditionNotMet`] for failed guards.
    pub fn apply(
        &mut self,
        action: BacklogItemAction,
        clock: &impl Clock,
    ) -> Result<ItemTransition, BacklogItemDomainError> {
        let from = self.state;
        let step = from
            .step(action)
            .ok_or(BacklogItemDomainError::InvalidState {
                item_id: self.id,
                action,
                state: from,
            })?;
        match step {
            Step::Stay => {
                debug!(item_id = %self.id, %action, state = %from, "backlog item already in target state");
                Ok(ItemTransition::Unchanged(from))
            }
            Step::Move(to) => {
                self.check_guard(action)?;
                self.install(action, to, clock);
                Ok(ItemTransition::Moved { from, to })
            }
        }
    }

    /// Opens a discussion thread.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemDomainError::CompletedItemImmutable`] once the
    /// item is done and [`BacklogItemDomainError::EmptyThreadSubject`] for a
    /// blank subject.
    pub fn start_discussion(
        &mut self,
        subject: &str,
        clock: &impl Clock,
    ) -> Result<ThreadId, BacklogItemDomainError> {
        self.ensure_open_for_discussion()?;
        let thread = DiscussionThread::new(subject, clock.utc())?;
        let thread_id = thread.id();
        self.discussions.push(thread);
        self.touch(clock);
        Ok(thread_id)
    }

    /// Posts a message and returns the users who should hear about it.
    ///
    /// Recipients are the earlier authors of the thread plus the assigned
    /// developer, excluding the author, each listed once.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemDomainError::CompletedItemImmutable`] once the
    /// item is done, [`BacklogItemDomainError::EmptyMessage`] for a blank
    /// body and [`BacklogItemDomainError::ThreadNotFound`] for unknown ids.
    pub fn post_message(
        &mut self,
        thread_id: ThreadId,
        author: UserId,
        content: &str,
        clock: &impl Clock,
    ) -> Result<Vec<UserId>, BacklogItemDomainError> {
        self.ensure_open_for_discussion()?;
        let body = content.trim();
        if body.is_empty() {
            return Err(BacklogItemDomainError::EmptyMessage);
        }
        let item_id = self.id;
        let developer = self.assigned_developer;
        let thread = self
            .discussions
            .iter_mut()
            .find(|thread| thread.id() == thread_id)
            .ok_or(BacklogItemDomainError::ThreadNotFound { item_id, thread_id })?;

        let mut recipients = thread.participants();
        if let Some(dev) = developer
            && !recipients.contains(&dev)
        {
            recipients.push(dev);
        }
        recipients.retain(|participant| *participant != author);

        thread.append(author, body.to_owned(), clock.utc());
        self.touch(clock);
        Ok(recipients)
    }

    /// Posts to the first discussion thread, opening one named after the
    /// item when none exists.
    ///
    /// The message is validated before a thread is opened, so a rejected
    /// post leaves the discussions untouched.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogItemDomainError::CompletedItemImmutable`] once the
    /// item is done and [`BacklogItemDomainError::EmptyMessage`] for a blank
    /// body.
    pub fn post_to_first_thread(
        &mut self,
        author: UserId,
        content: &str,
        clock: &impl Clock,
    ) -> Result<Vec<UserId>, BacklogItemDomainError> {
        self.ensure_open_for_discussion()?;
        if content.trim().is_empty() {
            return Err(BacklogItemDomainError::EmptyMessage);
        }
        let thread_id = match self.discussions.first() {
            Some(thread) => thread.id(),
            None => {
                let subject = self.title.clone();
                self.start_discussion(&subject, clock)?
            }
        };
        self.post_message(thread_id, author, content, clock)
    }

    fn ensure_open_for_discussion(&self) -> Result<(), BacklogItemDomainError> {
        if self.state == BacklogItemState::Done {
            return Err(BacklogItemDomainError::CompletedItemImmutable(self.id));
        }
        Ok(())
    }

    fn check_guard(&self, action: BacklogItemAction) -> Result<(), BacklogItemDomainError> {
        let unmet = match action {
            BacklogItemAction::StartTask if self.assigned_developer.is_none() => {
                Some(ItemPrecondition::NoDeveloperAssigned)
            }
            BacklogItemAction::CompleteTask if !self.activities_done() => {
                Some(ItemPrecondition::ActivitiesIncomplete)
            }
            _ => None,
        };
        unmet.map_or(Ok(()), |reason| {
            Err(BacklogItemDomainError::PreconditionNotMet {
                item_id: self.id,
                action,
                reason,
            })
        })
    }

    fn install(&mut self, action: BacklogItemAction, to: BacklogItemState, clock: &impl Clock) {
        let from = self.state;
        self.state = to;
        self.touch(clock);
        info!(item_id = %self.id, %from, %to, "backlog item state installed");
        let event = BacklogItemEvent {
            item_id: self.id,
            title: self.title.clone(),
            from,
            to,
            kind: BacklogItemEventKind::for_action(action),
            occurred_at: self.updated_at,
        };
        let report = self.observers.notify(&event);
        debug!(item_id = %self.id, delivered = report.delivered, failed = report.failed, "backlog item observers notified");
    }

    fn activity_mut(
        &mut self,
        activity_id: ActivityId,
    ) -> Result<&mut Activity, BacklogItemDomainError> {
        let item_id = self.id;
        self.activities
            .iter_mut()
            .find(|activity| activity.id() == activity_id)
            .ok_or(BacklogItemDomainError::ActivityNotFound {
                item_id,
                activity_id,
            })
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

impl Identified for BacklogItem {
    type Id = BacklogItemId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl WorkItem for Activity {
    fn is_done(&self) -> bool {
        Self::is_done(self)
    }

    fn label(&self) -> String {
        self.description().to_owned()
    }
}

impl WorkItem for BacklogItem {
    fn is_done(&self) -> bool {
        Self::is_done(self)
    }

    fn label(&self) -> String {
        format!(
            "{} ({}, {}/{} activities done)",
            self.title,
            self.state,
            self.completed_activity_count(),
            self.activities.len()
        )
    }

    fn children(&self) -> Vec<&dyn WorkItem> {
        self.activities
            .iter()
            .map(|activity| activity as &dyn WorkItem)
            .collect()
    }
}
