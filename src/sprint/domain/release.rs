//! Release sub-protocol types.

use super::{SprintId, SprintState};
use std::fmt;

/// Identifies one release attempt of one sprint.
///
/// A pipeline result is applied only when its ticket still matches the
/// sprint's active attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReleaseTicket {
    /// Sprint being released.
    pub sprint_id: SprintId,
    /// Attempt number, starting at 1 and increasing per release start.
    pub attempt: u64,
}

/// What happened to a pipeline result delivered to a sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseResolution {
    /// The result completed the active release.
    Applied {
        /// State installed by the result.
        state: SprintState,
        /// Pipeline outcome.
        success: bool,
    },
    /// The sprint had already left the attempt; the result was dropped.
    Discarded {
        /// State of the sprint when the result arrived.
        current_state: SprintState,
    },
    /// The sprint could not be locked, so the result never reached it.
    Undeliverable {
        /// Pipeline outcome that was lost.
        success: bool,
    },
}

impl ReleaseResolution {
    /// Returns whether the result was applied.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Completion callback captured when a release starts.
///
/// Runs exactly once with the outcome: `false` on cancellation or pipeline
/// failure, `true` on success. It runs while the sprint is locked and must
/// not lock the same sprint.
pub struct ReleaseCallback(Box<dyn FnOnce(bool) + Send>);

impl ReleaseCallback {
    /// Wraps a closure.
    #[must_use]
    pub fn new(callback: impl FnOnce(bool) + Send + 'static) -> Self {
        Self(Box::new(callback))
    }

    /// A callback that does nothing.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    pub(super) fn invoke(self, success: bool) {
        (self.0)(success);
    }
}

impl fmt::Debug for ReleaseCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ReleaseCallback(..)")
    }
}
