//! Email delivery channel.

use super::{Outbox, OutboxEntry};
use crate::notification::{domain::DeliveryError, ports::NotificationChannel};
use crate::user::domain::{ChannelKind, User};
use tracing::info;

/// Delivers messages to the recipient's email address.
#[derive(Debug, Clone, Default)]
pub struct EmailChannel {
    outbox: Outbox,
}

impl EmailChannel {
    /// Creates a channel that records deliveries in `outbox`.
    #[must_use]
    pub const fn new(outbox: Outbox) -> Self {
        Self { outbox }
    }
}

impl NotificationChannel for EmailChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    fn send(&self, message: &str, recipient: &User) -> Result<(), DeliveryError> {
        let address = recipient
            .contacts()
            .email()
            .ok_or(DeliveryError::MissingContact {
                user_id: recipient.id(),
                channel: ChannelKind::Email,
            })?;
        info!(user_id = %recipient.id(), address, "sending email notification");
        self.outbox.push(OutboxEntry {
            channel: ChannelKind::Email,
            recipient: recipient.id(),
            address: address.to_owned(),
            message: message.to_owned(),
        })
    }
}
