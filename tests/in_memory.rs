//! In-memory integration tests.
//!
//! Tests are organised into modules by functionality:
//! - `scrum_flow_tests`: Backlog items and review sprints end to end
//! - `release_flow_tests`: Release outcomes, retries, cancellation, timeouts
//! - `user_repository_tests`: User lookups and uniqueness

mod in_memory {
    pub mod helpers;

    mod release_flow_tests;
    mod scrum_flow_tests;
    mod user_repository_tests;
}
