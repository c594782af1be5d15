//! Users taking part in the Scrum process.
//!
//! Developers, Scrum Masters and Product Owners share one [`domain::User`]
//! aggregate distinguished by [`domain::Role`]. Users carry contact channels
//! and notification preferences consumed by the notification fabric.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
