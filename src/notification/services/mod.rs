//! Dispatch and observer services for notifications.

mod dispatch;
mod observer;
mod registry;

pub use dispatch::ChannelNotificationService;
pub use observer::UserObserver;
pub use registry::UserObserverRegistry;
