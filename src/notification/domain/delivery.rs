//! Delivery outcomes.

use crate::error::ErrorKind;
use crate::user::domain::{ChannelKind, UserId};
use thiserror::Error;

/// Failure to deliver one message over one channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The recipient has no contact for the channel.
    #[error("user {user_id} has no {channel} contact")]
    MissingContact {
        /// Intended recipient.
        user_id: UserId,
        /// Channel that could not be used.
        channel: ChannelKind,
    },

    /// No channel of the requested kind is configured.
    #[error("no {0} channel is configured")]
    ChannelUnavailable(ChannelKind),

    /// The channel accepted the message but failed to hand it over.
    #[error("{channel} delivery failed: {reason}")]
    Transport {
        /// Channel that failed.
        channel: ChannelKind,
        /// Failure description.
        reason: String,
    },
}

impl DeliveryError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingContact { .. } => ErrorKind::Validation,
            Self::ChannelUnavailable(_) => ErrorKind::NotFound,
            Self::Transport { .. } => ErrorKind::Infrastructure,
        }
    }
}

/// Counts of delivery attempts for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeliveryReport {
    /// Messages handed to a channel.
    pub delivered: usize,
    /// Channel attempts that failed.
    pub failed: usize,
    /// Recipients skipped because they chose no channel.
    pub skipped: usize,
}

impl DeliveryReport {
    /// Adds another report's counts to this one.
    pub const fn merge(&mut self, other: Self) {
        self.delivered += other.delivered;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }

    /// Returns whether nothing failed.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed == 0
    }
}
