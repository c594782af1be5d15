//! Error types for the project domain.

use crate::error::ErrorKind;
use thiserror::Error;

/// Errors returned while constructing or mutating projects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectDomainError {
    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyName,
}

impl ProjectDomainError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyName => ErrorKind::Validation,
        }
    }
}
