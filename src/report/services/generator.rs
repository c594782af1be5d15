//! Assembles sprint reports and renders them through a strategy.

use crate::error::ErrorKind;
use crate::report::{
    adapters::template::{MarkdownReportStrategy, PlainTextReportStrategy},
    domain::{ReportError, ReportFormat, ReportOptions, SprintReport},
    ports::ReportGenerationStrategy,
};
use crate::shared::AggregateLockError;
use crate::sprint::{
    domain::SprintId,
    ports::{SprintRepository, SprintRepositoryError},
};
use crate::user::ports::{UserRepository, UserRepositoryError};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for report operations.
#[derive(Debug, Error)]
pub enum ReportServiceError {
    /// Capturing or rendering failed.
    #[error(transparent)]
    Report(#[from] ReportError),
    /// Sprint repository operation failed.
    #[error(transparent)]
    Sprints(#[from] SprintRepositoryError),
    /// User repository operation failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),
    /// The sprint does not exist.
    #[error("sprint not found: {0}")]
    SprintNotFound(SprintId),
    /// No strategy is registered for the format.
    #[error("no strategy renders {0} reports")]
    UnsupportedFormat(ReportFormat),
}

impl ReportServiceError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Report(err) => err.kind(),
            Self::Sprints(err) => err.kind(),
            Self::Users(err) => err.kind(),
            Self::SprintNotFound(_) | Self::UnsupportedFormat(_) => ErrorKind::NotFound,
        }
    }
}

impl From<AggregateLockError> for ReportServiceError {
    fn from(err: AggregateLockError) -> Self {
        Self::Report(ReportError::Lock(err))
    }
}

/// Result type for report service operations.
pub type ReportServiceResult<T> = Result<T, ReportServiceError>;

/// Builds sprint reports with resolved member names.
#[derive(Clone)]
pub struct ReportService<S, U>
where
    S: SprintRepository,
    U: UserRepository,
{
    sprints: Arc<S>,
    users: Arc<U>,
    strategies: Vec<Arc<dyn ReportGenerationStrategy>>,
}

impl<S, U> ReportService<S, U>
where
    S: SprintRepository,
    U: UserRepository,
{
    /// Creates a service with the plain-text and markdown strategies.
    #[must_use]
    pub fn new(sprints: Arc<S>, users: Arc<U>) -> Self {
        Self {
            sprints,
            users,
            strategies: vec![
                Arc::new(PlainTextReportStrategy),
                Arc::new(MarkdownReportStrategy),
            ],
        }
    }

    /// Adds a strategy, replacing any strategy for the same format.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Arc<dyn ReportGenerationStrategy>) -> Self {
        let format = strategy.format();
        self.strategies.retain(|existing| existing.format() != format);
        self.strategies.push(strategy);
        self
    }

    /// Captures a report for a sprint, naming its members.
    ///
    /// Users missing from the repository keep their identifier as name.
    ///
    /// # Errors
    ///
    /// Returns [`ReportServiceError::SprintNotFound`] for unknown sprints and
    /// [`ReportServiceError::Report`] when an aggregate lock is poisoned.
    pub async fn build(&self, sprint_id: SprintId) -> ReportServiceResult<SprintReport> {
        let handle = self
            .sprints
            .find_by_id(sprint_id)
            .await?
            .ok_or(ReportServiceError::SprintNotFound(sprint_id))?;
        let mut report = {
            let sprint = handle.lock()?;
            SprintReport::from_sprint(&sprint)?
        };

        let mut names = HashMap::new();
        for user_id in report.member_ids() {
            if let Some(user) = self.users.find_by_id(user_id).await? {
                names.insert(user_id, user.name().to_owned());
            }
        }
        report.name_members(|user_id| names.get(&user_id).cloned());
        Ok(report)
    }

    /// Captures and renders a report in `format`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportServiceError::UnsupportedFormat`] when no strategy is
    /// registered for `format`, plus the errors of [`Self::build`].
    pub async fn generate(
        &self,
        sprint_id: SprintId,
        format: ReportFormat,
        options: &ReportOptions,
    ) -> ReportServiceResult<String> {
        let strategy = self
            .strategies
            .iter()
            .find(|strategy| strategy.format() == format)
            .cloned()
            .ok_or(ReportServiceError::UnsupportedFormat(format))?;
        let report = self.build(sprint_id).await?;
        let document = strategy.generate(&report, options)?;
        info!(sprint_id = %sprint_id, %format, "sprint report generated");
        Ok(document)
    }
}
