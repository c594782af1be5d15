//! Backlog items, their activities and their lifecycle state machine.
//!
//! A backlog item moves through `todo → doing → ready for testing → testing
//! → tested → done`, with guards on developer assignment and activity
//! completion, and broadcasts a structured event to its observers on every
//! installed state. Activities and items form a small composite used for
//! completion aggregation and display. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
