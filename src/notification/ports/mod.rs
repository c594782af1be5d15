//! Port contracts for notification delivery.

pub mod channel;
pub mod service;

#[cfg(test)]
pub use channel::MockNotificationChannel;
pub use channel::NotificationChannel;
pub use service::NotificationService;
