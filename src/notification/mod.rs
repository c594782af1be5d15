//! Notification fabric: users observing backlog items and sprints.
//!
//! Backlog items and sprints broadcast structured events. Each interested
//! user is represented by a [`services::UserObserver`] that turns the event
//! into a message, dispatches it over the user's preferred channels through
//! a [`ports::NotificationService`], and records role-specific follow-ups.
//! Delivery failures are logged and never reach the caller of a transition.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Dispatch and observer services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
