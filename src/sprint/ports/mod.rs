//! Port contracts for sprint persistence and release execution.

pub mod executor;
pub mod repository;

pub use executor::{ReleaseExecutor, ReleaseJob, ReleaseJobError, ReleaseRequest};
pub use repository::{SprintRepository, SprintRepositoryError, SprintRepositoryResult};
