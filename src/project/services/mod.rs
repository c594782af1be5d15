//! Service layer for project use cases.

mod catalogue;

pub use catalogue::{ProjectService, ProjectServiceError, ProjectServiceResult};
