//! Sprint aggregate and its transition engine.

use super::{
    ReleaseCallback, ReleaseResolution, ReleaseTicket, SprintAction, SprintDomainError,
    SprintEvent, SprintEventKind, SprintId, SprintPrecondition, SprintState, SprintType,
};
use crate::observer::{Observer, ObserverId, ObserverSet};
use crate::pipeline::DevelopmentPipeline;
use crate::project::domain::ProjectId;
use crate::shared::{AggregateLockError, Identified, Shared};
use crate::user::domain::UserId;
use crate::work_item::domain::{BacklogItemId, SharedBacklogItem};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shared, lock-protected handle to a sprint.
pub type SharedSprint = Shared<Sprint>;

/// A sprint state change that was installed and broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SprintTransition {
    /// State before the transition.
    pub from: SprintState,
    /// Newly installed state.
    pub to: SprintState,
}

/// Input for creating a sprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SprintDraft {
    /// Sprint name.
    pub name: String,
    /// Review or release sprint.
    pub sprint_type: SprintType,
    /// First moment work may start.
    pub start: DateTime<Utc>,
    /// Planned end of the sprint.
    pub end: DateTime<Utc>,
    /// Owning project.
    pub project_id: ProjectId,
    /// Scrum Master running the sprint.
    pub scrum_master: UserId,
    /// Product Owner of the owning project.
    pub product_owner: UserId,
}

#[derive(Debug)]
struct ActiveRelease {
    attempt: u64,
    callback: ReleaseCallback,
}

/// A time-boxed iteration over a set of backlog items.
#[derive(Debug)]
pub struct Sprint {
    id: SprintId,
    project_id: ProjectId,
    name: String,
    sprint_type: SprintType,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    scrum_master: UserId,
    product_owner: UserId,
    team_members: Vec<UserId>,
    backlog: Vec<SharedBacklogItem>,
    pipeline: Option<DevelopmentPipeline>,
    review_document_path: Option<String>,
    state: SprintState,
    release: Option<ActiveRelease>,
    release_attempts: u64,
    observers: ObserverSet<SprintEvent>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
}

fn validated_name(raw: &str) -> Result<String, SprintDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SprintDomainError::EmptyName);
    }
    Ok(trimmed.to_owned())
}

fn validate_dates(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), SprintDomainError> {
    if end <= start {
        return Err(SprintDomainError::InvalidDateRange { start, end });
    }
    Ok(())
}

impl Sprint {
    /// Creates a sprint in [`SprintState::Created`].
    ///
    /// The Scrum Master and Product Owner observers are attached for the
    /// sprint's whole lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::EmptyName`] for a blank name and
    /// [`SprintDomainError::InvalidDateRange`] when `end <= start`.
    pub fn new(
        draft: SprintDraft,
        scrum_master: Arc<dyn Observer<SprintEvent>>,
        product_owner: Arc<dyn Observer<SprintEvent>>,
        clock: &impl Clock,
    ) -> Result<Self, SprintDomainError> {
        let name = validated_name(&draft.name)?;
        validate_dates(draft.start, draft.end)?;
        let mut observers = ObserverSet::new();
        observers.attach(scrum_master);
        observers.attach(product_owner);
        let timestamp = clock.utc();
        Ok(Self {
            id: SprintId::new(),
            project_id: draft.project_id,
            name,
            sprint_type: draft.sprint_type,
            start: draft.start,
            end: draft.end,
            scrum_master: draft.scrum_master,
            product_owner: draft.product_owner,
            team_members: Vec::new(),
            backlog: Vec::new(),
            pipeline: None,
            review_document_path: None,
            state: SprintState::Created,
            release: None,
            release_attempts: 0,
            observers,
            created_at: timestamp,
            updated_at: timestamp,
            closed_at: None,
        })
    }

    /// Returns the sprint identifier.
    #[must_use]
    pub const fn id(&self) -> SprintId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the sprint name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the sprint type.
    #[must_use]
    pub const fn sprint_type(&self) -> SprintType {
        self.sprint_type
    }

    /// Returns the start date.
    #[must_use]
    pub const fn start_date(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the end date.
    #[must_use]
    pub const fn end_date(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns the Scrum Master.
    #[must_use]
    pub const fn scrum_master(&self) -> UserId {
        self.scrum_master
    }

    /// Returns the Product Owner.
    #[must_use]
    pub const fn product_owner(&self) -> UserId {
        self.product_owner
    }

    /// Returns the team in insertion order.
    #[must_use]
    pub fn team_members(&self) -> &[UserId] {
        &self.team_members
    }

    /// Returns the sprint backlog in insertion order.
    #[must_use]
    pub fn backlog(&self) -> &[SharedBacklogItem] {
        &self.backlog
    }

    /// Returns the identifiers of the sprint backlog items.
    #[must_use]
    pub fn backlog_ids(&self) -> Vec<BacklogItemId> {
        self.backlog.iter().map(SharedBacklogItem::id).collect()
    }

    /// Returns the release pipeline, if attached.
    #[must_use]
    pub const fn pipeline(&self) -> Option<&DevelopmentPipeline> {
        self.pipeline.as_ref()
    }

    /// Returns the review summary location once reviewed.
    #[must_use]
    pub fn review_document_path(&self) -> Option<&str> {
        self.review_document_path.as_deref()
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SprintState {
        self.state
    }

    /// Returns the ticket of the running release, if any.
    #[must_use]
    pub fn active_release(&self) -> Option<ReleaseTicket> {
        self.release.as_ref().map(|release| ReleaseTicket {
            sprint_id: self.id,
            attempt: release.attempt,
        })
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

    /// Returns when the sprint was closed.
    #[must_use]
    pub const fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Returns the attached observer identities in attachment order.
    #[must_use]
    pub fn observer_ids(&self) -> Vec<ObserverId> {
        self.observers.ids()
    }

    /// Attaches an extra observer. Returns `false` when already attached.
    pub fn attach_observer(&mut self, observer: Arc<dyn Observer<SprintEvent>>) -> bool {
        self.observers.attach(observer)
    }

    /// Detaches an observer. The Scrum Master and Product Owner stay
    /// attached; detaching them returns `false`.
    pub fn detach_observer(&mut self, observer_id: ObserverId) -> bool {
        if self.is_stakeholder_observer(observer_id) {
            return false;
        }
        self.observers.detach(observer_id)
    }

    /// Returns whether the backlog is non-empty and every item is done.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateLockError`] when an item lock is poisoned.
    pub fn all_items_done(&self) -> Result<bool, AggregateLockError> {
        if self.backlog.is_empty() {
            return Ok(false);
        }
        for item in &self.backlog {
            if !item.lock()?.is_done() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Adds a developer and attaches their observer.
    ///
    /// Returns `false` when the developer is already on the team.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::InvalidState`] outside `created`.
    pub fn add_team_member(
        &mut self,
        member: UserId,
        observer: Arc<dyn Observer<SprintEvent>>,
        clock: &impl Clock,
    ) -> Result<bool, SprintDomainError> {
        self.ensure_allowed(SprintAction::AddTeamMember)?;
        if self.team_members.contains(&member) {
            return Ok(false);
        }
        self.team_members.push(member);
        self.observers.attach(observer);
        self.touch(clock);
        Ok(true)
    }

    /// Removes a developer and detaches their observer.
    ///
    /// Returns `false` when the developer was not on the team.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::InvalidState`] outside `created`.
    pub fn remove_team_member(
        &mut self,
        member: UserId,
        clock: &impl Clock,
    ) -> Result<bool, SprintDomainError> {
        self.ensure_allowed(SprintAction::RemoveTeamMember)?;
        let before = self.team_members.len();
        self.team_members.retain(|existing| *existing != member);
        if self.team_members.len() == before {
            return Ok(false);
        }
        self.detach_observer(member.observer_id());
        self.touch(clock);
        Ok(true)
    }

    /// Adds an item to the sprint backlog.
    ///
    /// Returns `false` when the item is already in the backlog.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::InvalidState`] outside `created`.
    pub fn add_backlog_item(
        &mut self,
        item: SharedBacklogItem,
        clock: &impl Clock,
    ) -> Result<bool, SprintDomainError> {
        self.ensure_allowed(SprintAction::AddBacklogItem)?;
        if self.backlog.iter().any(|existing| existing.id() == item.id()) {
            return Ok(false);
        }
        self.backlog.push(item);
        self.touch(clock);
        Ok(true)
    }

    /// Removes an item from the sprint backlog.
    ///
    /// Returns `false` when the item was not in the backlog.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::InvalidState`] outside `created`.
    pub fn remove_backlog_item(
        &mut self,
        item_id: BacklogItemId,
        clock: &impl Clock,
    ) -> Result<bool, SprintDomainError> {
        self.ensure_allowed(SprintAction::RemoveBacklogItem)?;
        let before = self.backlog.len();
        self.backlog.retain(|existing| existing.id() != item_id);
        if self.backlog.len() == before {
            return Ok(false);
        }
        self.touch(clock);
        Ok(true)
    }

    /// Renames the sprint.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::InvalidState`] outside `created` and
    /// [`SprintDomainError::EmptyName`] for a blank name.
    pub fn rename(&mut self, name: &str, clock: &impl Clock) -> Result<(), SprintDomainError> {
        self.ensure_allowed(SprintAction::Rename)?;
        self.name = validated_name(name)?;
        self.touch(clock);
        Ok(())
    }

    /// Moves the sprint period.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::InvalidState`] outside `created` and
    /// [`SprintDomainError::InvalidDateRange`] when `end <= start`.
    pub fn change_dates(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        clock: &impl Clock,
    ) -> Result<(), SprintDomainError> {
        self.ensure_allowed(SprintAction::ChangeDates)?;
        validate_dates(start, end)?;
        self.start = start;
        self.end = end;
        self.touch(clock);
        Ok(())
    }

    /// Attaches or replaces the release pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::InvalidState`] once a release started or
    /// the sprint was reviewed.
    pub fn attach_pipeline(
        &mut self,
        pipeline: DevelopmentPipeline,
        clock: &impl Clock,
    ) -> Result<(), SprintDomainError> {
        self.ensure_allowed(SprintAction::AttachPipeline)?;
        self.pipeline = Some(pipeline);
        self.touch(clock);
        Ok(())
    }

    /// `created → running`.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::InvalidState`] outside `created` and
    /// [`SprintDomainError::PreconditionNotMet`] without team members,
    /// without backlog items or before the start date.
    pub fn start(&mut self, clock: &impl Clock) -> Result<SprintTransition, SprintDomainError> {
        let action = SprintAction::StartSprint;
        self.ensure_allowed(action)?;
        if self.team_members.is_empty() {
            return Err(self.unmet(action, SprintPrecondition::NoTeamMembers));
        }
        if self.backlog.is_empty() {
            return Err(self.unmet(action, SprintPrecondition::NoBacklogItems));
        }
        if clock.utc() < self.start {
            return Err(self.unmet(action, SprintPrecondition::BeforeStartDate));
        }
        Ok(self.install(SprintState::Running, SprintEventKind::StateChanged, clock))
    }

    /// `running → finished`.
    ///
    /// Finishing early or with incomplete items only logs a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::InvalidState`] outside `running`.
    pub fn finish(&mut self, clock: &impl Clock) -> Result<SprintTransition, SprintDomainError> {
        self.ensure_allowed(SprintAction::FinishSprint)?;
        let before_end = clock.utc() < self.end;
        let items_done = self.all_items_done().unwrap_or_else(|err| {
            warn!(sprint_id = %self.id, error = %err, "backlog could not be inspected; treating items as incomplete");
            false
        });
        if before_end || !items_done {
            warn!(
                sprint_id = %self.id,
                before_end,
                items_done,
                "finishing sprint before its end date or with incomplete items"
            );
        }
        Ok(self.install(SprintState::Finished, SprintEventKind::StateChanged, clock))
    }

    /// `finished → releasing`, capturing `callback` for the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::InvalidState`] outside `finished` or for
    /// review sprints, and [`SprintDomainError::PreconditionNotMet`] without
    /// a pipeline. The callback is dropped uninvoked on error.
    pub fn start_release(
        &mut self,
        callback: ReleaseCallback,
        clock: &impl Clock,
    ) -> Result<ReleaseTicket, SprintDomainError> {
        let action = SprintAction::StartRelease;
        self.ensure_allowed(action)?;
        if self.pipeline.is_none() {
            return Err(self.unmet(action, SprintPrecondition::NoPipeline));
        }
        self.release_attempts += 1;
        let ticket = ReleaseTicket {
            sprint_id: self.id,
            attempt: self.release_attempts,
        };
        self.release = Some(ActiveRelease {
            attempt: ticket.attempt,
            callback,
        });
        self.install(SprintState::Releasing, SprintEventKind::StateChanged, clock);
        Ok(ticket)
    }

    /// `releasing → cancelled`. Invokes the release callback with `false`,
    /// then notifies observers.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::InvalidState`] outside `releasing` or for
    /// review sprints.
    pub fn cancel_release(
        &mut self,
        clock: &impl Clock,
    ) -> Result<SprintTransition, SprintDomainError> {
        self.ensure_allowed(SprintAction::CancelRelease)?;
        let from = self.set_state(SprintState::Cancelled, clock);
        if let Some(release) = self.release.take() {
            release.callback.invoke(false);
        }
        self.broadcast(from, SprintEventKind::ReleaseCancelled);
        Ok(SprintTransition {
            from,
            to: SprintState::Cancelled,
        })
    }

    /// Applies a pipeline outcome to the running release.
    ///
    /// `true` installs `released`; `false` returns the sprint to `finished`
    /// so the release can be retried. Observers are notified, then the
    /// release callback runs with `success`.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::InvalidState`] outside `releasing`.
    pub fn handle_release_result(
        &mut self,
        success: bool,
        clock: &impl Clock,
    ) -> Result<SprintTransition, SprintDomainError> {
        self.ensure_allowed(SprintAction::HandleReleaseResult)?;
        Ok(self.conclude_release(success, clock))
    }

    /// Delivers a pipeline outcome for `ticket`.
    ///
    /// The outcome is applied only while the sprint is still releasing under
    /// the same attempt; otherwise it is logged and discarded.
    pub fn complete_release(
        &mut self,
        ticket: ReleaseTicket,
        success: bool,
        clock: &impl Clock,
    ) -> ReleaseResolution {
        if self.active_release() != Some(ticket) || self.state != SprintState::Releasing {
            warn!(
                sprint_id = %self.id,
                attempt = ticket.attempt,
                success,
                state = %self.state,
                "discarding stale release result"
            );
            return ReleaseResolution::Discarded {
                current_state: self.state,
            };
        }
        let transition = self.conclude_release(success, clock);
        ReleaseResolution::Applied {
            state: transition.to,
            success,
        }
    }

    /// `finished → reviewed`, storing the review document location.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::InvalidState`] outside `finished` or for
    /// release sprints, and [`SprintDomainError::EmptyReviewDocumentPath`]
    /// for a blank path.
    pub fn review(
        &mut self,
        document_path: &str,
        clock: &impl Clock,
    ) -> Result<SprintTransition, SprintDomainError> {
        self.ensure_allowed(SprintAction::ReviewSprint)?;
        let path = document_path.trim();
        if path.is_empty() {
            return Err(SprintDomainError::EmptyReviewDocumentPath);
        }
        self.review_document_path = Some(path.to_owned());
        Ok(self.install(
            SprintState::Reviewed,
            SprintEventKind::Reviewed {
                document_path: path.to_owned(),
            },
            clock,
        ))
    }

    /// Closes a released, reviewed or cancelled sprint.
    ///
    /// The first close records `closed_at` and notifies observers; closing
    /// again is a silent no-op. Returns whether this call closed the sprint.
    ///
    /// # Errors
    ///
    /// Returns [`SprintDomainError::InvalidState`] from any other state.
    pub fn close(&mut self, clock: &impl Clock) -> Result<bool, SprintDomainError> {
        self.ensure_allowed(SprintAction::CloseSprint)?;
        if self.closed_at.is_some() {
            debug!(sprint_id = %self.id, "sprint already closed");
            return Ok(false);
        }
        self.touch(clock);
        self.closed_at = Some(self.updated_at);
        info!(sprint_id = %self.id, state = %self.state, "sprint closed");
        self.broadcast(self.state, SprintEventKind::Closed);
        Ok(true)
    }

    fn conclude_release(&mut self, success: bool, clock: &impl Clock) -> SprintTransition {
        let (to, kind) = if success {
            (SprintState::Released, SprintEventKind::Released)
        } else {
            (SprintState::Finished, SprintEventKind::ReleaseFailed)
        };
        let transition = self.install(to, kind, clock);
        if let Some(release) = self.release.take() {
            release.callback.invoke(success);
        }
        transition
    }

    fn ensure_allowed(&self, action: SprintAction) -> Result<(), SprintDomainError> {
        if let Some(reason) = self.sprint_type.forbids(action) {
            return Err(self.invalid(action, reason));
        }
        if !self.state.allows(action) {
            return Err(self.invalid(action, self.state.refusal(action)));
        }
        Ok(())
    }

    const fn invalid(&self, action: SprintAction, reason: &'static str) -> SprintDomainError {
        SprintDomainError::InvalidState {
            sprint_id: self.id,
            action,
            state: self.state,
            reason,
        }
    }

    const fn unmet(&self, action: SprintAction, reason: SprintPrecondition) -> SprintDomainError {
        SprintDomainError::PreconditionNotMet {
            sprint_id: self.id,
            action,
            reason,
        }
    }

    fn is_stakeholder_observer(&self, observer_id: ObserverId) -> bool {
        observer_id == self.scrum_master.observer_id()
            || observer_id == self.product_owner.observer_id()
    }

    fn install(
        &mut self,
        to: SprintState,
        kind: SprintEventKind,
        clock: &impl Clock,
    ) -> SprintTransition {
        let from = self.set_state(to, clock);
        self.broadcast(from, kind);
        SprintTransition { from, to }
    }

    fn set_state(&mut self, to: SprintState, clock: &impl Clock) -> SprintState {
        let from = std::mem::replace(&mut self.state, to);
        self.touch(clock);
        info!(sprint_id = %self.id, %from, %to, "sprint state installed");
        from
    }

    fn broadcast(&self, from: SprintState, kind: SprintEventKind) {
        let event = SprintEvent {
            sprint_id: self.id,
            name: self.name.clone(),
            from,
            to: self.state,
            kind,
            occurred_at: self.updated_at,
        };
        let report = self.observers.notify(&event);
        debug!(sprint_id = %self.id, delivered = report.delivered, failed = report.failed, "sprint observers notified");
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

impl Identified for Sprint {
    type Id = SprintId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
