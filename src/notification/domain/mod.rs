//! Domain model for notifications.

mod delivery;
mod event;
mod reaction;

pub use delivery::{DeliveryError, DeliveryReport};
pub use event::LifecycleEvent;
pub use reaction::{
    DeveloperReaction, FollowUp, ProductOwnerReaction, RoleReaction, ScrumMasterReaction,
    reaction_for,
};
