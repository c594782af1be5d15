//! Port contracts for user lookup and persistence.

pub mod repository;

pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
