//! Single-owner cells for mutable lifecycle aggregates.
//!
//! Backlog items and sprints are mutated by use cases and, for releases, by
//! an asynchronous pipeline completion. Every transition runs as one critical
//! section: read the current state, check guards, install the next state and
//! notify observers. [`Shared`] provides that section.

use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use crate::error::ErrorKind;

/// Aggregates that expose a stable identifier.
pub trait Identified {
    /// Identifier type of the aggregate.
    type Id: Copy + Eq + Hash + fmt::Display + fmt::Debug + Send + Sync + 'static;

    /// Returns the aggregate identifier.
    fn id(&self) -> Self::Id;
}

/// Error returned when an aggregate lock was poisoned by a panicking holder.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("aggregate {id} is unavailable: {reason}")]
pub struct AggregateLockError {
    /// Display form of the aggregate identifier.
    pub id: String,
    /// Description of the poisoning failure.
    pub reason: String,
}

impl AggregateLockError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Infrastructure
    }
}

/// Shared handle serialising all mutation of one aggregate.
pub struct Shared<T: Identified> {
    id: T::Id,
    inner: Arc<Mutex<T>>,
}

impl<T: Identified> Shared<T> {
    /// Wraps an aggregate in a new shared cell.
    #[must_use]
    pub fn new(aggregate: T) -> Self {
        Self {
            id: aggregate.id(),
            inner: Arc::new(Mutex::new(aggregate)),
        }
    }

    /// Returns the aggregate identifier without locking.
    #[must_use]
    pub const fn id(&self) -> T::Id {
        self.id
    }

    /// Locks the aggregate for the duration of the returned guard.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateLockError`] when a previous holder panicked.
    pub fn lock(&self) -> Result<MutexGuard<'_, T>, AggregateLockError> {
        self.inner.lock().map_err(|err| AggregateLockError {
            id: self.id.to_string(),
            reason: err.to_string(),
        })
    }

    /// Runs `operation` with exclusive access to the aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateLockError`] when a previous holder panicked.
    pub fn with<R>(&self, operation: impl FnOnce(&mut T) -> R) -> Result<R, AggregateLockError> {
        let mut guard = self.lock()?;
        Ok(operation(&mut guard))
    }

    /// Returns whether both handles point at the same cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Identified> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Identified> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared").field("id", &self.id).finish_non_exhaustive()
    }
}
