//! Delivery channel strategy.

use crate::notification::domain::DeliveryError;
use crate::user::domain::{ChannelKind, User};

/// A way of delivering a message to a user, such as email or chat.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationChannel: Send + Sync {
    /// Returns the channel kind users opt into.
    fn kind(&self) -> ChannelKind;

    /// Delivers `message` to `recipient`.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] when the recipient cannot be reached over
    /// this channel.
    fn send(&self, message: &str, recipient: &User) -> Result<(), DeliveryError>;
}
