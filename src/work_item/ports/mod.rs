//! Port contracts for backlog item persistence.

pub mod repository;

pub use repository::{
    BacklogItemRepository, BacklogItemRepositoryError, BacklogItemRepositoryResult,
};
