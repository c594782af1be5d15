//! Port for running a release pipeline outside the caller's critical
//! section.
//!
//! A sprint enters `releasing` synchronously; the pipeline then runs
//! elsewhere and its outcome is delivered back through
//! [`Sprint::complete_release`](crate::sprint::domain::Sprint::complete_release)
//! with the ticket captured at start. Executors never hold the sprint lock
//! while the pipeline runs, so a cancellation can always get in first.

use crate::error::ErrorKind;
use crate::pipeline::DevelopmentPipeline;
use crate::sprint::domain::{ReleaseResolution, ReleaseTicket, SharedSprint};
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};

/// Everything an executor needs to run one release attempt.
#[derive(Debug, Clone)]
pub struct ReleaseRequest {
    /// Snapshot of the sprint's pipeline at release start.
    pub pipeline: DevelopmentPipeline,
    /// Sprint receiving the outcome.
    pub sprint: SharedSprint,
    /// Attempt the outcome belongs to.
    pub ticket: ReleaseTicket,
}

/// Runs release pipelines in the background.
pub trait ReleaseExecutor: Send + Sync {
    /// Starts the pipeline and returns a handle to the pending outcome.
    ///
    /// Must be called from within a Tokio runtime.
    fn execute(&self, request: ReleaseRequest) -> ReleaseJob;
}

/// Error returned when a release job could not report its outcome.
#[derive(Debug, Error)]
pub enum ReleaseJobError {
    /// The background task panicked or was aborted.
    #[error("release job failed to complete: {0}")]
    Join(#[from] JoinError),
}

impl ReleaseJobError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Infrastructure
    }
}

/// Handle to a release attempt running in the background.
#[derive(Debug)]
pub struct ReleaseJob {
    ticket: ReleaseTicket,
    handle: JoinHandle<ReleaseResolution>,
}

impl ReleaseJob {
    /// Wraps a spawned task producing the resolution for `ticket`.
    #[must_use]
    pub const fn new(ticket: ReleaseTicket, handle: JoinHandle<ReleaseResolution>) -> Self {
        Self { ticket, handle }
    }

    /// Returns the attempt this job reports on.
    #[must_use]
    pub const fn ticket(&self) -> ReleaseTicket {
        self.ticket
    }

    /// Returns whether the background task has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the pipeline outcome to be delivered to the sprint.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseJobError::Join`] when the background task panicked.
    pub async fn wait(self) -> Result<ReleaseResolution, ReleaseJobError> {
        Ok(self.handle.await?)
    }
}
