//! Generic subject/observer fabric.
//!
//! Aggregates that broadcast lifecycle events own an [`ObserverSet`]. An
//! observer implements [`Observer`] for each event type it understands and is
//! identified by an [`ObserverId`], which makes attachment idempotent.

mod set;

pub use set::{BroadcastReport, ObserverSet};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Identity of an attached observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObserverId(Uuid);

impl ObserverId {
    /// Creates a new random observer identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an observer identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability of reacting to events of type `E`.
pub trait Observer<E>: Send + Sync {
    /// Returns the identity used for idempotent attachment and detachment.
    fn observer_id(&self) -> ObserverId;

    /// Reacts to a broadcast event.
    ///
    /// # Errors
    ///
    /// Returns [`ObserverError`] when the reaction fails. The failure is
    /// logged by the broadcasting set and never reaches the subject's caller.
    fn on_notified(&self, event: &E) -> Result<(), ObserverError>;
}

/// Failure raised by an observer while reacting to an event.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("observer {observer_id} failed to react: {reason}")]
pub struct ObserverError {
    /// Observer whose reaction failed.
    pub observer_id: ObserverId,
    /// Human-readable failure description.
    pub reason: String,
}

impl ObserverError {
    /// Creates a reaction failure for the given observer.
    #[must_use]
    pub fn new(observer_id: ObserverId, reason: impl Into<String>) -> Self {
        Self {
            observer_id,
            reason: reason.into(),
        }
    }
}
