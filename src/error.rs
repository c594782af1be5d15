//! Error classification shared by every bounded context.
//!
//! Each module defines its own `thiserror` enum; [`ErrorKind`] lets callers
//! tell apart a transition-table violation from a failed business guard, a
//! missing entity, or malformed input without matching on module-specific
//! variants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The action is not legal for the entity's current state.
    InvalidState,
    /// The action is legal for the state but a business guard failed.
    PreconditionNotMet,
    /// A repository lookup found nothing for the given identifier.
    NotFound,
    /// The caller supplied malformed input.
    Validation,
    /// A persistence, lock, or runtime fault outside the domain rules.
    Infrastructure,
}

impl ErrorKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidState => "invalid_state",
            Self::PreconditionNotMet => "precondition_not_met",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::Infrastructure => "infrastructure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
