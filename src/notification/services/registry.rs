//! One observer per user, shared across every subject they watch.

use super::UserObserver;
use crate::notification::{domain::FollowUp, ports::NotificationService};
use crate::user::domain::{User, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Hands out the [`UserObserver`] for each user.
///
/// The same user always gets the same observer, so attaching it to many
/// items and sprints gathers all follow-ups in one place.
pub struct UserObserverRegistry {
    notifier: Arc<dyn NotificationService>,
    observers: Mutex<HashMap<UserId, Arc<UserObserver>>>,
}

impl UserObserverRegistry {
    /// Creates a registry dispatching through `notifier`.
    #[must_use]
    pub fn new(notifier: Arc<dyn NotificationService>) -> Self {
        Self {
            notifier,
            observers: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the notification service used by the observers.
    #[must_use]
    pub const fn notifier(&self) -> &Arc<dyn NotificationService> {
        &self.notifier
    }

    /// Returns the observer for `user`, refreshing its user snapshot.
    #[must_use]
    pub fn observer_for(&self, user: &User) -> Arc<UserObserver> {
        let mut observers = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let observer = observers
            .entry(user.id())
            .or_insert_with(|| Arc::new(UserObserver::new(user.clone(), Arc::clone(&self.notifier))));
        observer.refresh(user.clone());
        Arc::clone(observer)
    }

    /// Returns the follow-ups recorded for a user.
    #[must_use]
    pub fn follow_ups(&self, user_id: UserId) -> Vec<FollowUp> {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&user_id)
            .map(|observer| observer.follow_ups())
            .unwrap_or_default()
    }
}
