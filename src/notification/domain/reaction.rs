//! Role-specific reactions layered on top of message dispatch.

use super::LifecycleEvent;
use crate::sprint::domain::SprintEventKind;
use crate::user::domain::{Role, UserId};
use crate::work_item::domain::BacklogItemEventKind;
use serde::{Deserialize, Serialize};

/// A follow-up a user should act on after an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUp {
    /// User who owns the follow-up.
    pub user_id: UserId,
    /// Role that produced it.
    pub role: Role,
    /// What to do.
    pub note: String,
    /// Event that triggered it.
    pub event: LifecycleEvent,
}

/// Role-specific reaction to lifecycle events.
///
/// Reactions inspect the event variant, never the message text.
pub trait RoleReaction: Send + Sync {
    /// Returns a follow-up note when the role should act on `event`.
    fn follow_up(&self, event: &LifecycleEvent) -> Option<String>;
}

/// Developers only receive the message.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeveloperReaction;

/// Scrum Masters track rejected items and release outcomes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrumMasterReaction;

/// Product Owners track release outcomes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductOwnerReaction;

impl RoleReaction for DeveloperReaction {
    fn follow_up(&self, _event: &LifecycleEvent) -> Option<String> {
        None
    }
}

impl RoleReaction for ScrumMasterReaction {
    fn follow_up(&self, event: &LifecycleEvent) -> Option<String> {
        match event {
            LifecycleEvent::Item(item) if item.kind == BacklogItemEventKind::TestRejected => Some(
                format!("Discuss the rejected backlog item '{}' with its developer", item.title),
            ),
            LifecycleEvent::Item(_) => None,
            LifecycleEvent::Sprint(sprint) => match sprint.kind {
                SprintEventKind::ReleaseFailed => Some(format!(
                    "Investigate the failed release pipeline of sprint '{}'",
                    sprint.name
                )),
                SprintEventKind::ReleaseCancelled => Some(format!(
                    "Confirm the cancelled release of sprint '{}' with the team",
                    sprint.name
                )),
                SprintEventKind::Released => {
                    Some(format!("Close sprint '{}' now that it is released", sprint.name))
                }
                _ => None,
            },
        }
    }
}

impl RoleReaction for ProductOwnerReaction {
    fn follow_up(&self, event: &LifecycleEvent) -> Option<String> {
        let LifecycleEvent::Sprint(sprint) = event else {
            return None;
        };
        match sprint.kind {
            SprintEventKind::ReleaseCancelled => Some(format!(
                "Decide how to continue after the cancelled release of sprint '{}'",
                sprint.name
            )),
            SprintEventKind::Released => Some(format!(
                "Announce the release of sprint '{}' to stakeholders",
                sprint.name
            )),
            _ => None,
        }
    }
}

/// Returns the reaction for a role.
#[must_use]
pub const fn reaction_for(role: Role) -> &'static dyn RoleReaction {
    match role {
        Role::Developer => &DeveloperReaction,
        Role::ScrumMaster => &ScrumMasterReaction,
        Role::ProductOwner => &ProductOwnerReaction,
    }
}
