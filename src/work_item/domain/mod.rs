//! Domain model for backlog items.
//!
//! The backlog item aggregate owns its activities and discussion threads and
//! enforces the transition table of [`BacklogItemState`]. Persistence and
//! notification delivery stay outside this boundary.

mod activity;
mod backlog_item;
mod composite;
mod discussion;
mod error;
mod event;
mod ids;
mod state;

pub use activity::Activity;
pub use backlog_item::{BacklogItem, ItemTransition, SharedBacklogItem};
pub use composite::WorkItem;
pub use discussion::{DiscussionMessage, DiscussionThread};
pub use error::{BacklogItemDomainError, ItemPrecondition, ParseBacklogItemStateError};
pub use event::{BacklogItemEvent, BacklogItemEventKind};
pub use ids::{ActivityId, BacklogItemId, ThreadId};
pub use state::{ALL_ITEM_STATES, BacklogItemAction, BacklogItemState, Step};
