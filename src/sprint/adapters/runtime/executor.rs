//! Executor that runs pipelines on Tokio's blocking pool.

use super::ReleaseExecutorConfig;
use crate::sprint::{
    domain::{ReleaseResolution, ReleaseTicket, SharedSprint},
    ports::{ReleaseExecutor, ReleaseJob, ReleaseRequest},
};
use mockable::DefaultClock;
use tracing::{info, warn};

/// Runs each release on a blocking worker and feeds the outcome back into
/// the sprint.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioReleaseExecutor {
    config: ReleaseExecutorConfig,
}

impl TokioReleaseExecutor {
    /// Creates an executor with the given settings.
    #[must_use]
    pub const fn new(config: ReleaseExecutorConfig) -> Self {
        Self { config }
    }

    /// Returns the executor settings.
    #[must_use]
    pub const fn config(&self) -> ReleaseExecutorConfig {
        self.config
    }
}

impl ReleaseExecutor for TokioReleaseExecutor {
    fn execute(&self, request: ReleaseRequest) -> ReleaseJob {
        let ReleaseRequest {
            pipeline,
            sprint,
            ticket,
        } = request;
        let timeout = self.config.timeout();
        info!(sprint_id = %ticket.sprint_id, attempt = ticket.attempt, pipeline = pipeline.name(), "release pipeline scheduled");

        let handle = tokio::spawn(async move {
            let run = tokio::task::spawn_blocking(move || pipeline.execute());
            let success = match timeout {
                Some(limit) => match tokio::time::timeout(limit, run).await {
                    Ok(joined) => joined.unwrap_or_else(|err| {
                        warn!(error = %err, "release pipeline panicked");
                        false
                    }),
                    Err(_) => {
                        warn!(sprint_id = %ticket.sprint_id, ?limit, "release pipeline timed out");
                        false
                    }
                },
                None => run.await.unwrap_or_else(|err| {
                    warn!(error = %err, "release pipeline panicked");
                    false
                }),
            };
            deliver(&sprint, ticket, success)
        });
        ReleaseJob::new(ticket, handle)
    }
}

fn deliver(sprint: &SharedSprint, ticket: ReleaseTicket, success: bool) -> ReleaseResolution {
    match sprint.lock() {
        Ok(mut guard) => guard.complete_release(ticket, success, &DefaultClock),
        Err(err) => {
            warn!(sprint_id = %ticket.sprint_id, error = %err, "release result could not be delivered");
            ReleaseResolution::Undeliverable { success }
        }
    }
}
