//! In-memory backlog item adapters.

mod backlog_item;

pub use backlog_item::InMemoryBacklogItemRepository;
