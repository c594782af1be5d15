//! Inspectable record of delivered messages.

use crate::notification::domain::DeliveryError;
use crate::user::domain::{ChannelKind, UserId};
use std::sync::{Arc, Mutex, PoisonError};

/// One delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxEntry {
    /// Channel used.
    pub channel: ChannelKind,
    /// Recipient.
    pub recipient: UserId,
    /// Address the message went to.
    pub address: String,
    /// Message body.
    pub message: String,
}

/// Shared, append-only list of delivered messages.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    entries: Arc<Mutex<Vec<OutboxEntry>>>,
}

impl Outbox {
    /// Creates an empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn push(&self, entry: OutboxEntry) -> Result<(), DeliveryError> {
        let channel = entry.channel;
        self.entries
            .lock()
            .map_err(|err| DeliveryError::Transport {
                channel,
                reason: err.to_string(),
            })?
            .push(entry);
        Ok(())
    }

    /// Returns every delivered message in delivery order.
    #[must_use]
    pub fn entries(&self) -> Vec<OutboxEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the messages delivered to one user, in delivery order.
    #[must_use]
    pub fn messages_for(&self, recipient: UserId) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.recipient == recipient)
            .map(|entry| entry.message)
            .collect()
    }
}
