//! Ordered, idempotent observer registry with snapshot broadcast.

use std::fmt;
use std::sync::Arc;
use tracing::warn;

use super::{Observer, ObserverId};

/// Outcome of one broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BroadcastReport {
    /// Observers whose reaction completed.
    pub delivered: usize,
    /// Observers whose reaction returned an error.
    pub failed: usize,
}

/// Observers attached to one subject, kept in attachment order.
pub struct ObserverSet<E> {
    observers: Vec<Arc<dyn Observer<E>>>,
}

impl<E> ObserverSet<E> {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Attaches an observer unless one with the same identity is present.
    ///
    /// Returns `true` when the observer was added.
    pub fn attach(&mut self, observer: Arc<dyn Observer<E>>) -> bool {
        if self.contains(observer.observer_id()) {
            return false;
        }
        self.observers.push(observer);
        true
    }

    /// Detaches the observer with the given identity if present.
    ///
    /// Returns `true` when an observer was removed.
    pub fn detach(&mut self, observer_id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers
            .retain(|observer| observer.observer_id() != observer_id);
        self.observers.len() != before
    }

    /// Returns whether an observer with the given identity is attached.
    #[must_use]
    pub fn contains(&self, observer_id: ObserverId) -> bool {
        self.observers
            .iter()
            .any(|observer| observer.observer_id() == observer_id)
    }

    /// Returns the identities of attached observers in attachment order.
    #[must_use]
    pub fn ids(&self) -> Vec<ObserverId> {
        self.observers
            .iter()
            .map(|observer| observer.observer_id())
            .collect()
    }

    /// Returns the number of attached observers.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.observers.len()
    }

    /// Returns whether no observer is attached.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Delivers `event` to every observer attached when the call starts.
    ///
    /// The broadcast iterates a snapshot of the set, in attachment order. A
    /// failing observer is logged and skipped; the remaining observers still
    /// receive the event.
    #[must_use]
    pub fn notify(&self, event: &E) -> BroadcastReport {
        let snapshot: Vec<Arc<dyn Observer<E>>> = self.observers.clone();
        let mut report = BroadcastReport::default();
        for observer in snapshot {
            match observer.on_notified(event) {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    warn!(observer_id = %err.observer_id, error = %err, "observer reaction failed");
                    report.failed += 1;
                }
            }
        }
        report
    }
}

impl<E> Default for ObserverSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for ObserverSet<E> {
    fn clone(&self) -> Self {
        Self {
            observers: self.observers.clone(),
        }
    }
}

impl<E> fmt::Debug for ObserverSet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}
