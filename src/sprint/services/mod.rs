//! Service layer for sprint use cases.

mod planning;

pub use planning::{
    SprintRepositories, SprintService, SprintServiceError, SprintServiceResult,
};
