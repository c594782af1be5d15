//! Chat delivery channel.

use super::{Outbox, OutboxEntry};
use crate::notification::{domain::DeliveryError, ports::NotificationChannel};
use crate::user::domain::{ChannelKind, User};
use tracing::info;

/// Delivers direct messages to the recipient's chat handle.
#[derive(Debug, Clone, Default)]
pub struct ChatChannel {
    outbox: Outbox,
}

impl ChatChannel {
    /// Creates a channel that records deliveries in `outbox`.
    #[must_use]
    pub const fn new(outbox: Outbox) -> Self {
        Self { outbox }
    }
}

impl NotificationChannel for ChatChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Chat
    }

    fn send(&self, message: &str, recipient: &User) -> Result<(), DeliveryError> {
        let handle = recipient
            .contacts()
            .chat_handle()
            .ok_or(DeliveryError::MissingContact {
                user_id: recipient.id(),
                channel: ChannelKind::Chat,
            })?;
        info!(user_id = %recipient.id(), handle, "sending chat notification");
        self.outbox.push(OutboxEntry {
            channel: ChannelKind::Chat,
            recipient: recipient.id(),
            address: format!("@{handle}"),
            message: message.to_owned(),
        })
    }
}
