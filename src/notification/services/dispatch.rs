//! Preference-driven dispatch over configured channels.

use crate::notification::{
    domain::{DeliveryError, DeliveryReport},
    ports::{NotificationChannel, NotificationService},
};
use crate::user::domain::{ChannelKind, User};
use std::sync::Arc;
use tracing::{info, warn};

/// Sends each message over the recipient's preferred channels.
#[derive(Clone, Default)]
pub struct ChannelNotificationService {
    channels: Vec<Arc<dyn NotificationChannel>>,
}

impl ChannelNotificationService {
    /// Creates a service without channels.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a channel, replacing any channel of the same kind.
    #[must_use]
    pub fn with_channel(mut self, channel: Arc<dyn NotificationChannel>) -> Self {
        let kind = channel.kind();
        self.channels.retain(|existing| existing.kind() != kind);
        self.channels.push(channel);
        self
    }

    fn channel(&self, kind: ChannelKind) -> Result<&Arc<dyn NotificationChannel>, DeliveryError> {
        self.channels
            .iter()
            .find(|channel| channel.kind() == kind)
            .ok_or(DeliveryError::ChannelUnavailable(kind))
    }
}

impl NotificationService for ChannelNotificationService {
    fn send(&self, message: &str, recipient: &User) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        if recipient.preferences().is_empty() {
            warn!(user_id = %recipient.id(), "recipient has no notification preferences; skipping");
            report.skipped += 1;
            return report;
        }
        for kind in recipient.preferences() {
            match self.send_via(*kind, message, recipient) {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    warn!(user_id = %recipient.id(), channel = %kind, error = %err, "notification delivery failed");
                    report.failed += 1;
                }
            }
        }
        report
    }

    fn send_via(
        &self,
        channel: ChannelKind,
        message: &str,
        recipient: &User,
    ) -> Result<(), DeliveryError> {
        self.channel(channel)?.send(message, recipient)?;
        info!(user_id = %recipient.id(), %channel, "notification delivered");
        Ok(())
    }
}
