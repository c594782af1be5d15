//! Report rendering strategy.

use crate::report::domain::{ReportError, ReportFormat, ReportOptions, SprintReport};

/// Turns a sprint report into a document of one format.
pub trait ReportGenerationStrategy: Send + Sync {
    /// Returns the format this strategy produces.
    fn format(&self) -> ReportFormat;

    /// Renders `report`, decorated with the header and footer in `options`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Render`] when the document cannot be produced.
    fn generate(&self, report: &SprintReport, options: &ReportOptions)
    -> Result<String, ReportError>;
}
