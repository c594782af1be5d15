//! In-memory sprint adapters.

mod sprint;

pub use sprint::InMemorySprintRepository;
