//! Read-only snapshot of a sprint for reporting.

use crate::shared::AggregateLockError;
use crate::sprint::domain::{Sprint, SprintId, SprintState, SprintType};
use crate::user::domain::UserId;
use crate::work_item::domain::{BacklogItemState, WorkItem};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A person named in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportMember {
    /// User identifier.
    pub user_id: UserId,
    /// Name shown in the report; the identifier until resolved.
    pub display_name: String,
}

impl ReportMember {
    fn unresolved(user_id: UserId) -> Self {
        Self {
            user_id,
            display_name: user_id.to_string(),
        }
    }
}

/// One sprint backlog item as it stood when the report was captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportItem {
    /// Item title.
    pub title: String,
    /// Lifecycle state.
    pub state: BacklogItemState,
    /// Estimated effort.
    pub story_points: u32,
    /// Whether the item and all its activities are done.
    pub done: bool,
    /// Task-list outline of the item and its activities.
    pub outline: String,
}

/// Snapshot of a sprint, detached from the live aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SprintReport {
    /// Reported sprint.
    pub sprint_id: SprintId,
    /// Sprint name.
    pub name: String,
    /// Wrap-up kind.
    pub sprint_type: SprintType,
    /// State at capture time.
    pub state: SprintState,
    /// Planned start.
    pub start: DateTime<Utc>,
    /// Planned end.
    pub end: DateTime<Utc>,
    /// Scrum Master of the sprint.
    pub scrum_master: ReportMember,
    /// Team members in insertion order.
    pub team: Vec<ReportMember>,
    /// Sprint backlog in insertion order.
    pub items: Vec<ReportItem>,
    /// Review summary location, once reviewed.
    pub review_document_path: Option<String>,
}

impl SprintReport {
    /// Captures a report from a sprint the caller has locked.
    ///
    /// Each backlog item is locked briefly while its outline is rendered,
    /// following the sprint-before-item lock order.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateLockError`] when a backlog item lock is poisoned.
    pub fn from_sprint(sprint: &Sprint) -> Result<Self, AggregateLockError> {
        let items = sprint
            .backlog()
            .iter()
            .map(|handle| -> Result<ReportItem, AggregateLockError> {
                let item = handle.lock()?;
                Ok(ReportItem {
                    title: item.title().to_owned(),
                    state: item.state(),
                    story_points: item.story_points(),
                    done: WorkItem::is_done(&*item),
                    outline: item.render(0).trim_end().to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sprint_id: sprint.id(),
            name: sprint.name().to_owned(),
            sprint_type: sprint.sprint_type(),
            state: sprint.state(),
            start: sprint.start_date(),
            end: sprint.end_date(),
            scrum_master: ReportMember::unresolved(sprint.scrum_master()),
            team: sprint
                .team_members()
                .iter()
                .copied()
                .map(ReportMember::unresolved)
                .collect(),
            items,
            review_document_path: sprint.review_document_path().map(str::to_owned),
        })
    }

    /// Returns every user named in the report, Scrum Master first.
    #[must_use]
    pub fn member_ids(&self) -> Vec<UserId> {
        std::iter::once(self.scrum_master.user_id)
            .chain(self.team.iter().map(|member| member.user_id))
            .collect()
    }

    /// Replaces identifiers with display names where `lookup` knows them.
    pub fn name_members(&mut self, lookup: impl Fn(UserId) -> Option<String>) {
        for member in std::iter::once(&mut self.scrum_master).chain(self.team.iter_mut()) {
            if let Some(name) = lookup(member.user_id) {
                member.display_name = name;
            }
        }
    }

    /// Returns the story points of the whole sprint backlog.
    #[must_use]
    pub fn total_story_points(&self) -> u32 {
        self.items.iter().map(|item| item.story_points).sum()
    }

    /// Returns the story points of completed items.
    #[must_use]
    pub fn completed_story_points(&self) -> u32 {
        self.items
            .iter()
            .filter(|item| item.done)
            .map(|item| item.story_points)
            .sum()
    }
}
