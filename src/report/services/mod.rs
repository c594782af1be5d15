//! Service layer for report use cases.

mod generator;

pub use generator::{ReportService, ReportServiceError, ReportServiceResult};
