//! Service layer for backlog item use cases.

mod lifecycle;

pub use lifecycle::{
    BacklogItemService, BacklogItemServiceError, BacklogItemServiceResult,
    CreateBacklogItemRequest,
};
