//! Domain model for users, roles and notification preferences.

mod error;
mod ids;
mod user;

pub use error::{ParseRoleError, UserDomainError};
pub use ids::UserId;
pub use user::{ChannelKind, ContactChannels, Role, User};
