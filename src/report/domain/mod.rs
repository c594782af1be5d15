//! Domain model for sprint reports.

mod error;
mod format;
mod options;
mod report;

pub use error::ReportError;
pub use format::{ParseReportFormatError, ReportFormat};
pub use options::ReportOptions;
pub use report::{ReportItem, ReportMember, SprintReport};
