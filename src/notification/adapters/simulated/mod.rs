//! Channels that record deliveries in an in-process outbox.

mod chat;
mod email;
mod outbox;

pub use chat::ChatChannel;
pub use email::EmailChannel;
pub use outbox::{Outbox, OutboxEntry};
