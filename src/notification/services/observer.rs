//! Users as observers of backlog items and sprints.

use crate::notification::{
    domain::{FollowUp, LifecycleEvent, reaction_for},
    ports::NotificationService,
};
use crate::observer::{Observer, ObserverError, ObserverId};
use crate::sprint::domain::SprintEvent;
use crate::user::domain::{User, UserId};
use crate::work_item::domain::BacklogItemEvent;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::info;

/// Reacts to lifecycle events on behalf of one user.
///
/// Every event is dispatched as a message over the user's preferred
/// channels; the user's role may add a [`FollowUp`].
pub struct UserObserver {
    user_id: UserId,
    user: RwLock<User>,
    notifier: Arc<dyn NotificationService>,
    follow_ups: Mutex<Vec<FollowUp>>,
}

impl UserObserver {
    /// Creates an observer for `user`.
    #[must_use]
    pub fn new(user: User, notifier: Arc<dyn NotificationService>) -> Self {
        Self {
            user_id: user.id(),
            user: RwLock::new(user),
            notifier,
            follow_ups: Mutex::new(Vec::new()),
        }
    }

    /// Returns the observed user's identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns a snapshot of the observed user.
    #[must_use]
    pub fn user(&self) -> User {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the user snapshot, e.g. after preferences changed.
    pub fn refresh(&self, user: User) {
        if user.id() != self.user_id {
            return;
        }
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = user;
    }

    /// Returns the follow-ups recorded so far, oldest first.
    #[must_use]
    pub fn follow_ups(&self) -> Vec<FollowUp> {
        self.follow_ups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn react(&self, event: LifecycleEvent) -> Result<(), ObserverError> {
        let user = self.user();
        let message = event.message();
        info!(user_id = %self.user_id, role = %user.role(), %message, "user notified");
        let report = self.notifier.send(&message, &user);

        if let Some(note) = reaction_for(user.role()).follow_up(&event) {
            info!(user_id = %self.user_id, %note, "follow-up recorded");
            self.follow_ups
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(FollowUp {
                    user_id: self.user_id,
                    role: user.role(),
                    note,
                    event,
                });
        }

        if report.is_clean() {
            Ok(())
        } else {
            Err(ObserverError::new(
                self.user_id.observer_id(),
                format!("{} notification deliveries failed", report.failed),
            ))
        }
    }
}

impl Observer<BacklogItemEvent> for UserObserver {
    fn observer_id(&self) -> ObserverId {
        self.user_id.observer_id()
    }

    fn on_notified(&self, event: &BacklogItemEvent) -> Result<(), ObserverError> {
        self.react(LifecycleEvent::Item(event.clone()))
    }
}

impl Observer<SprintEvent> for UserObserver {
    fn observer_id(&self) -> ObserverId {
        self.user_id.observer_id()
    }

    fn on_notified(&self, event: &SprintEvent) -> Result<(), ObserverError> {
        self.react(LifecycleEvent::Sprint(event.clone()))
    }
}
