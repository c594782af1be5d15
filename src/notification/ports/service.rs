//! Notification dispatch contract.

use crate::notification::domain::{DeliveryError, DeliveryReport};
use crate::user::domain::{ChannelKind, User};

/// Dispatches messages to users over their preferred channels.
///
/// Dispatch is synchronous: observers call it while the notifying aggregate
/// is locked. Per-channel failures are counted in the returned report and
/// never escalated.
pub trait NotificationService: Send + Sync {
    /// Sends `message` to `recipient` over each preferred channel, in
    /// preference order.
    fn send(&self, message: &str, recipient: &User) -> DeliveryReport;

    /// Sends `message` to every recipient.
    fn send_to_many(&self, message: &str, recipients: &[User]) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for recipient in recipients {
            report.merge(self.send(message, recipient));
        }
        report
    }

    /// Sends `message` over one explicit channel, ignoring preferences.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] when the channel is not configured or the
    /// recipient cannot be reached over it.
    fn send_via(
        &self,
        channel: ChannelKind,
        message: &str,
        recipient: &User,
    ) -> Result<(), DeliveryError>;
}
